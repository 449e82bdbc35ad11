use rs_ngram_core::config::TrainingConfig;
use rs_ngram_core::model::dataset::Dataset;
use rs_ngram_core::model::language_model::LanguageModel;
use rs_ngram_core::model::tokenizer::tokenize;
use rs_ngram_core::NGramError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Read NGRAM_* variables, "./data/corpus.txt" by default
    let mut config = TrainingConfig::from_env()?;

    // Words seen fewer times than this in the training set become <unk>
    config.count_threshold = 2;

    // Bigram, trigram and 4-gram models (context lengths 1 to 3)
    config.set_max_order(3)?;

    // Laplace smoothing
    config.set_k(1.0)?;

    // Invalid values are rejected and leave the config untouched
    match config.set_k(0.0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("k = 0 is invalid: {e}"),
    }

    // Tokenize, shuffle with a fixed seed, split 80/20 and build the vocabulary
    let dataset = Dataset::load(&config)?;
    let model = LanguageModel::from_dataset(&dataset, &config)?;
    println!(
        "{} training sentences, {} test sentences, {} known words",
        dataset.train.len(),
        dataset.test.len(),
        model.vocabulary().len()
    );

    // Unknown words of the prefix are mapped to <unk> like in training
    let prefix = model.vocabulary().replace_unknown(&tokenize("I like"));

    // One prediction per model order, side by side
    for (order, prediction) in model.orders().zip(model.predict_cascade(&prefix, None)?) {
        match prediction.word() {
            Some(word) => println!("order {order}: next word '{word}' ({:.4})", prediction.probability()),
            None => println!("order {order}: no prediction"),
        }
    }

    // Only words starting with "t"
    let prediction = model.predict(&prefix, 1, Some("t"))?;
    println!("bigram model, starting with 't': {:?}", prediction);

    // Nothing starts with "zz": this is a "no prediction", not a zero probability
    let prediction = model.predict(&prefix, 1, Some("zz"))?;
    println!("bigram model, starting with 'zz': {:?}", prediction);

    // Most likely continuations
    for (word, probability) in model.distribution(&prefix, 2)?.top(5) {
        println!("  {word:>10} {probability:.4}");
    }

    // Held-out perplexity, lower is better
    for order in model.orders() {
        match model.mean_perplexity(&dataset.test, order) {
            Ok(score) => println!("order {order}: test perplexity {score:.3}"),
            Err(NGramError::InvalidCorpus(e)) => println!("order {order}: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    // Smoothed bigram probabilities, for inspection
    println!("{}", model.matrix(1, true)?);

    // Asking for an order that was not trained
    match model.predict(&prefix, 9, None) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("order 9: {e}"),
    }

    Ok(())
}
