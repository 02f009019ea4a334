use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use adaptive_quiz::config::Config;
use adaptive_quiz::logging::init_tracing;
use adaptive_quiz::models::Question;
use adaptive_quiz::persistence::JsonFileProfileRepository;
use adaptive_quiz::services::{weak_topics, ProfileStore, QuestionBank, RecommendRequest, Recommender};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let student_ids: Vec<String> = std::env::args().skip(1).collect();
    if student_ids.is_empty() {
        eprintln!("usage: adaptive-quiz <student-id>...");
        return ExitCode::FAILURE;
    }

    let bank = match load_bank(&config) {
        Ok(bank) => bank,
        Err(err) => {
            tracing::error!(path = %config.question_bank_path.display(), error = %err, "failed to load question bank");
            return ExitCode::FAILURE;
        }
    };

    let settings = config.engine_settings();
    let repository = JsonFileProfileRepository::new(&config.profiles_path);
    let store = match ProfileStore::open(repository, settings.aggregation) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to open profile store");
            return ExitCode::FAILURE;
        }
    };
    let recommender = Recommender::new(settings.recommender);

    for student_id in &student_ids {
        let Some(profile) = store.get(student_id) else {
            tracing::warn!(student_id = %student_id, "no profile yet");
            continue;
        };

        let recommendations =
            recommender.recommend(student_id, profile, bank.questions(), &RecommendRequest::new());
        let report = serde_json::json!({
            "student_id": student_id,
            "profile": profile,
            "weak_topics": weak_topics(Some(profile)),
            "recommendations": recommendations,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => tracing::error!(error = %err, "failed to render report"),
        }
    }

    ExitCode::SUCCESS
}

fn load_bank(config: &Config) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    let file = File::open(&config.question_bank_path)?;
    let questions: Vec<Question> = serde_json::from_reader(BufReader::new(file))?;
    Ok(QuestionBank::new(questions)?)
}
