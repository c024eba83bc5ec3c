use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sim_ai::{allocate, take_turn, AiConfig, Outlook, Strategy};
use sim_core::{Country, CountryId, CountrySeed, GameRng};
use sim_econ::Economy;

fn bench_allocate(c: &mut Criterion) {
    let mut rng = GameRng::new(42);
    c.bench_function("allocate 30 points x 5 strategies", |b| {
        b.iter(|| {
            for s in Strategy::ALL {
                black_box(allocate(s.weights(), 30, &mut rng));
            }
        })
    });
}

fn bench_turns(c: &mut Criterion) {
    let eco = Economy::default();
    let mut base = Vec::with_capacity(16);
    for i in 0..16u32 {
        let mut country = Country::new(CountryId(i), format!("AI{i}"), false, &CountrySeed::default());
        eco.init_country(&mut country);
        country.money = 20_000;
        base.push(country);
    }
    let cfg = AiConfig::default();
    c.bench_function("16 ai turns", |b| {
        b.iter(|| {
            let mut rng = GameRng::new(7);
            let mut roster = base.clone();
            for (i, country) in roster.iter_mut().enumerate() {
                country.development_points = 12;
                let strategy = Strategy::ALL[i % Strategy::ALL.len()];
                black_box(take_turn(country, strategy, &Outlook::default(), &eco, 10, &cfg, &mut rng));
            }
        })
    });
}

criterion_group!(benches, bench_allocate, bench_turns);
criterion_main!(benches);
