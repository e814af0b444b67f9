use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use classifier_hub::{
    score_probability, ClassifierManager, ClassifyOptions, ClassifyResponse, FileStore,
    MemoryStopwordStore, NlpConfig, ResponseMode, Source, StopWordList, TextPreprocessor, Trainer,
    TrainingDocumentSpec, TrainingOptions, TrainingRequest, TokenizerKind,
};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory for file-backed classifiers (defaults to the cache directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Seed for reproducible shuffling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Delete the stored demo classifier before starting
    #[arg(short, long)]
    fresh: bool,
}

const DEMO_CLASSIFIER: &str = "demo-intents";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = NlpConfig::from_env().with_pos_tagging(true);
    if let Some(dir) = args.dir {
        config = config.with_classifier_dir(dir);
    }
    if let Some(seed) = args.seed {
        config = config.with_shuffle_seed(seed);
    }

    info!("=== Starting Classifier Hub Demo ===");
    if args.fresh {
        info!("Fresh start requested - removing stored classifier...");
        FileStore::new(&config.classifier_dir)?.remove(DEMO_CLASSIFIER).await?;
    }

    let manager = ClassifierManager::from_config(&config)?;
    let trainer = Trainer::for_manager(&manager, &config);
    let start_time = Instant::now();

    let handle = manager.get_or_create(DEMO_CLASSIFIER, Source::FileSystem, true).await?;
    let options = TrainingOptions::default()
        .with_tokenize(TokenizerKind::Standard)
        .with_shuffle();
    let request = TrainingRequest::new(DEMO_CLASSIFIER, vec![
        TrainingDocumentSpec::new(["reset my password", "I cannot log in"], ["account"]).with_options(options),
        TrainingDocumentSpec::new(["where is my parcel", "track my delivery"], ["shipping"]).with_options(options),
        TrainingDocumentSpec::new(["I want my money back", "refund my order"], ["billing"]).with_options(options),
    ]);
    let summary = trainer.train_batch(&request, false).await?;
    manager.save(DEMO_CLASSIFIER, Source::FileSystem).await?;
    info!("Trained {} documents in {:.2?}", summary.documents, start_time.elapsed());

    let stop_words = MemoryStopwordStore::with_lists(vec![StopWordList::new("english", ["the", "a", "is", "my"])]);
    let preprocessor = TextPreprocessor::from_config(&config).with_stop_word_store(Arc::new(stop_words));

    let test_inputs = [
        "Where is the parcel I ordered?",
        "My password is not working",
        "Please refund the order from Acme Corp",
    ];

    for text in test_inputs {
        let cleaned = TextPreprocessor::clean_special_characters(text);
        let filtered = preprocessor.remove_stop_words(&cleaned).await;

        let response = manager
            .classify(&filtered, ClassifyOptions::with_classifier(Arc::clone(&handle), ResponseMode::FullScores))
            .await?;

        println!("\nInput: {}", text);
        println!("  Preprocessed: {}", filtered);
        if let ClassifyResponse::FullScores(scores) = response {
            for score in scores {
                println!("    {}: {:.3} (p~{:.3})", score.label, score.value, score_probability(score.value, 10.0));
            }
        }

        let tokens = TextPreprocessor::clean_special_characters_tokens(text);
        let tagged = preprocessor.pos_tag(&tokens)?;
        let required = HashMap::from([("NNP".to_string(), "names".to_string())]);
        let entities = preprocessor.pos_handler(&tagged, &required)?;
        println!("  Names: {:?}", entities.field("names"));
    }

    info!("=== Demo Complete (took {:.2?}) ===", start_time.elapsed());
    Ok(())
}
