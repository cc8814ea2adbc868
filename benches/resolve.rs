use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use conference_standings::{CascadeRegistry, Conference, Resolver, TeamId, TieGroup};

/// A 16-team, 8-game conference season with deterministic results that
/// leave several multi-team ties in the middle of the table.
fn make_season(code: &str) -> (Conference, Vec<TeamId>) {
    let mut conf = Conference::new("Bench Conference", code);
    let ids: Vec<TeamId> = (0..16)
        .map(|i| conf.add_team(format!("Team {i:02}")).unwrap())
        .collect();

    for (i, home) in ids.iter().enumerate() {
        for offset in [1, 3, 5, 7] {
            let away = ids[(i + offset) % ids.len()];
            // mixes upsets into an otherwise seeded season
            let winner = if (i * 7 + offset) % 5 < 3 { *home } else { away };
            conf.add_game(*home, away, Some(winner)).unwrap();
        }
        if i % 3 == 0 {
            conf.record_non_conference_result(*home, true).unwrap();
        }
    }
    (conf, ids)
}

fn bench_resolve_full_group(c: &mut Criterion) {
    let registry = CascadeRegistry::builtin();
    let resolver = Resolver::new(&registry);
    let mut group = c.benchmark_group("resolve/full_group");
    for code in ["ACC", "B12", "B1G", "SEC"] {
        let (conf, ids) = make_season(code);
        let tied = TieGroup::new(ids).unwrap();
        group.throughput(Throughput::Elements(tied.len() as u64));
        group.bench_function(code, |b| {
            b.iter(|| resolver.resolve(black_box(&conf), black_box(&tied)).unwrap());
        });
    }
    group.finish();
}

fn bench_standings(c: &mut Criterion) {
    let registry = CascadeRegistry::builtin();
    let resolver = Resolver::new(&registry);
    let (conf, _) = make_season("SEC");
    c.bench_function("resolve/standings_sec", |b| {
        b.iter(|| resolver.standings(black_box(&conf)).unwrap());
    });
}

criterion_group!(resolve, bench_resolve_full_group, bench_standings);
criterion_main!(resolve);
