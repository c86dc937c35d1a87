use criterion::{Criterion, black_box, criterion_group, criterion_main};
use outreach_gen::{ExpanderConfig, SeededRandom, SpintaxExpander, SpintaxText, synthesize};

const EMAIL: &str = "{Hi|Hello|Hey} [first_name], {I hope this email finds you well|I hope you're doing well}. \
{I'm reaching out|I'm writing|I wanted to connect} because [company] {is growing|is hiring|just launched}. \
{Would you be open to|Are you free for|Could we set up} a {quick|short|brief} {call|chat} {this week|next week}? \
{Thanks|Cheers|Best}, [sender_name]";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| SpintaxText::parse(black_box(EMAIL))));
}

fn bench_expand(c: &mut Criterion) {
    let parsed = SpintaxText::parse(EMAIL).unwrap();

    let exhaustive = SpintaxExpander::with_config(ExpanderConfig {
        exhaustive_limit: u64::MAX,
        ..Default::default()
    });
    c.bench_function("expand_enumerated_20", |b| {
        let mut rng = SeededRandom::new(1);
        b.iter(|| exhaustive.expand(black_box(&parsed), 20, &mut rng))
    });

    let sampled = SpintaxExpander::with_config(ExpanderConfig {
        exhaustive_limit: 0,
        ..Default::default()
    });
    c.bench_function("expand_sampled_20", |b| {
        let mut rng = SeededRandom::new(1);
        b.iter(|| sampled.expand(black_box(&parsed), 20, &mut rng))
    });
}

fn bench_synthesize(c: &mut Criterion) {
    let text = "Hi Sam, I hope this email finds you well. I'm reaching out because I think we can help. \
                Let me know if a quick call works. Thanks!";
    c.bench_function("synthesize", |b| b.iter(|| synthesize(black_box(text))));
}

criterion_group!(benches, bench_parse, bench_expand, bench_synthesize);
criterion_main!(benches);
