use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_ngram_core::config::{env_parsed, TrainingConfig};
use rs_ngram_core::model::dataset::Dataset;
use rs_ngram_core::model::language_model::LanguageModel;
use rs_ngram_core::model::predictor::Prediction;
use rs_ngram_core::model::tokenizer::tokenize;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOP: usize = 10;

/// Query parameters of the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictParams {
	prefix: Option<String>,
	start_with: Option<String>,
	order: Option<usize>,
}

/// Query parameters of the `/v1/distribution` endpoint
#[derive(Deserialize)]
struct DistributionParams {
	prefix: Option<String>,
	order: Option<usize>,
	top: Option<usize>,
}

/// Query parameters of the `/v1/perplexity` endpoint
#[derive(Deserialize)]
struct PerplexityParams {
	sentence: String,
	order: Option<usize>,
}

#[derive(Serialize)]
struct OrderPrediction {
	order: usize,
	prediction: Prediction,
}

#[derive(Serialize)]
struct PerplexityScore {
	order: usize,
	perplexity: f64,
}

#[derive(Serialize)]
struct ModelInfo {
	vocabulary_size: usize,
	max_order: usize,
	k: f64,
	test_sentences: usize,
}

/// Trained model shared by every worker.
///
/// Tables are never mutated after training, so no lock is needed.
struct SharedData {
	model: LanguageModel,
	test_sentences: usize,
}

impl SharedData {
	/// Tokenizes user input and maps unknown words to the UNKNOWN token.
	fn tokens(&self, text: &str) -> Vec<String> {
		self.model.vocabulary().replace_unknown(&tokenize(text))
	}
}

/// HTTP GET endpoint `/v1/predict`
///
/// Predicts the next word after `prefix`, restricted to words starting with
/// `start_with` when given. Without `order`, returns one prediction per
/// trained order, lowest first.
#[get("/v1/predict")]
async fn get_prediction(data: web::Data<SharedData>, query: web::Query<PredictParams>) -> impl Responder {
	let prefix = data.tokens(query.prefix.as_deref().unwrap_or_default());
	let start_with = query.start_with.as_deref().filter(|s| !s.is_empty());

	let result = match query.order {
		Some(order) => data
			.model
			.predict(&prefix, order, start_with)
			.map(|prediction| vec![OrderPrediction { order, prediction }]),
		None => data.model.predict_cascade(&prefix, start_with).map(|predictions| {
			predictions
				.into_iter()
				.zip(data.model.orders())
				.map(|(prediction, order)| OrderPrediction { order, prediction })
				.collect()
		}),
	};

	match result {
		Ok(predictions) => HttpResponse::Ok().json(predictions),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/distribution`
///
/// Returns the `top` most probable next words after `prefix` as
/// `[word, probability]` pairs, highest first.
#[get("/v1/distribution")]
async fn get_distribution(data: web::Data<SharedData>, query: web::Query<DistributionParams>) -> impl Responder {
	let prefix = data.tokens(query.prefix.as_deref().unwrap_or_default());
	let order = query.order.unwrap_or(data.model.max_order());
	let top = query.top.unwrap_or(DEFAULT_TOP);

	match data.model.distribution(&prefix, order) {
		Ok(distribution) => HttpResponse::Ok().json(distribution.most_probable(top)),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/perplexity`
///
/// Scores `sentence` with the model of `order` (highest order by default).
#[get("/v1/perplexity")]
async fn get_perplexity(data: web::Data<SharedData>, query: web::Query<PerplexityParams>) -> impl Responder {
	let sentence = data.tokens(&query.sentence);
	let order = query.order.unwrap_or(data.model.max_order());

	match data.model.perplexity(&sentence, order) {
		Ok(perplexity) => HttpResponse::Ok().json(PerplexityScore { order, perplexity }),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

#[get("/v1/info")]
async fn get_info(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(ModelInfo {
		vocabulary_size: data.model.vocabulary().len(),
		max_order: data.model.max_order(),
		k: data.model.k(),
		test_sentences: data.test_sentences,
	})
}

/// Main entry point for the server.
///
/// Trains the model described by the `NGRAM_*` environment variables, logs
/// its test-set perplexity per order, then serves it over HTTP.
///
/// # Notes
/// - Binds to `NGRAM_HOST`:`NGRAM_PORT` (127.0.0.1:5000 by default).
/// - Set `RUST_LOG` to change the log level (info by default).
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = TrainingConfig::from_env()?;
	let host = env_parsed::<String>("HOST")?.unwrap_or_else(|| DEFAULT_HOST.to_owned());
	let port = env_parsed::<u16>("PORT")?.unwrap_or(DEFAULT_PORT);

	let dataset = Dataset::load(&config)?;
	let model = LanguageModel::from_dataset(&dataset, &config)?;

	if dataset.test.is_empty() {
		info!("No test sentence, skipping evaluation");
	} else {
		for order in model.orders() {
			match model.mean_perplexity(&dataset.test, order) {
				Ok(score) => info!("Order {} test perplexity: {:.3}", order, score),
				Err(e) => error!("Order {} evaluation failed: {}", order, e),
			}
		}
	}

	let shared_data = web::Data::new(SharedData { model, test_sentences: dataset.test.len() });

	info!("Listening on {}:{}", host, port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.service(get_prediction)
			.service(get_distribution)
			.service(get_perplexity)
			.service(get_info)
	})
		.bind((host.as_str(), port))?
		.run()
		.await?;

	Ok(())
}
