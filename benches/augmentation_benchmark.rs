use criterion::{black_box, criterion_group, criterion_main, Criterion};
use classifier_hub::{
    Augmenter, BayesClassifier, EntityMerger, RequiredTags, TaggedWords, TokenizerKind,
    TrainingDocumentSpec, TrainingOptions, WordTokenizer,
};

const MEDIUM_TEXT: &str = "This is a medium length text that should take more time to tokenize \
     and process due to its increased length and complexity. It contains \
     multiple sentences with various words and punctuation.";

fn bench_tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tokenization");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for kind in [TokenizerKind::Standard, TokenizerKind::Aggressive] {
        let tokenizer = WordTokenizer::new(kind);
        group.bench_function(kind.to_string(), |b| b.iter(|| {
            tokenizer.tokenize(black_box(MEDIUM_TEXT)).unwrap()
        }));
    }

    group.finish();
}

fn bench_augmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Augmentation");
    group.sample_size(50);

    let options = vec![
        ("base_only", TrainingOptions::default()),
        ("tokenize", TrainingOptions::default().with_tokenize(TokenizerKind::Standard)),
        ("everything", TrainingOptions::default()
            .with_tokenize(TokenizerKind::Aggressive)
            .with_shuffle()
            .with_shuffle_token()
            .with_tokenize_shuffle()),
    ];

    for (name, options) in options {
        let augmenter = Augmenter::with_seed(1);
        let spec = TrainingDocumentSpec::new(
            ["reset my password", "I cannot log in to my account", MEDIUM_TEXT],
            ["account", "login"],
        )
        .with_options(options);

        group.bench_function(name, |b| b.iter(|| {
            augmenter.documents(black_box(&spec)).filter_map(Result::ok).count()
        }));
    }

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut classifier = BayesClassifier::new();
    classifier.add_document("reset my password", "account");
    classifier.add_document("I cannot log in", "account");
    classifier.add_document("where is my parcel", "shipping");
    classifier.add_document("track my delivery", "shipping");
    classifier.add_document("refund my order", "billing");

    c.bench_function("classify", |b| b.iter(|| {
        classifier.classifications(black_box("my parcel never arrived and I want a refund"))
    }));
}

fn bench_entity_merge(c: &mut Criterion) {
    let merger = EntityMerger::new();
    let tagged = TaggedWords::from_pairs([
        ("Marie", "NNP"), ("Curie", "NNP"), ("and", "CC"), ("Pierre", "NNP"), ("Curie", "NNP"),
        ("worked", "VBD"), ("in", "IN"), ("Paris", "NNP"), ("France", "NNP"), ("Europe", "NNP"),
    ]);
    let required: RequiredTags = [("NNP".to_string(), "names".to_string())].into_iter().collect();

    c.bench_function("entity_merge", |b| b.iter(|| {
        merger.merge(black_box(&tagged), black_box(&required)).unwrap()
    }));
}

criterion_group!(
    benches,
    bench_tokenization,
    bench_augmentation,
    bench_classification,
    bench_entity_merge
);
criterion_main!(benches);
