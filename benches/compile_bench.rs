use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use warroom::galaxy::{Galaxy, Presence, Sector, Ship, ShipStatus, Species, SpeciesId};
use warroom::protocol::tokenize;
use warroom::resolver::{resolve_species, score};
use warroom::transcript::NullTranscript;
use warroom::turn::{compile_rosters, default_selection};
use warroom::CompileConfig;

const SPECIES: u16 = 60;
const SECTORS: i32 = 12;

const NAMES: [&str; 12] = [
    "Vegans", "Zorgons", "Humans", "Klaatu", "Mendari", "Oskari", "Pell", "Quorn", "Rasalhague",
    "Sirrah", "Tarazed", "Umbra",
];

fn species_name(id: u16) -> String {
    format!("{}{}", NAMES[id as usize % NAMES.len()], id)
}

/// A crowded galaxy: every species present in several shared sectors, with
/// a warship in each.
fn crowded_galaxy() -> Galaxy {
    let mut g = Galaxy::new();
    g.obfuscation_key = 0x5a5a;
    for id in 1..=SPECIES {
        let mut sp = Species::new(SpeciesId(id), species_name(id));
        sp.enemies.insert(SpeciesId(id % SPECIES + 1));
        g.species.insert(sp);
        for k in 0..3 {
            let n = (i32::from(id) + k * 5) % SECTORS;
            let sector = Sector::new(n, n * 2, n * 3);
            g.presences.push(Presence {
                species: SpeciesId(id),
                sector,
                planet: None,
            });
            g.ships.push(Ship {
                class: "BC".to_string(),
                name: format!("Ship{}x{}", id, k),
                owner: SpeciesId(id),
                sector,
                planet: None,
                status: ShipStatus::InDeepSpace,
                hidden: false,
            });
        }
    }
    g
}

fn crowded_orders() -> BTreeMap<SpeciesId, String> {
    (1..=SPECIES)
        .map(|id| {
            let mut text = String::from("; orders\nSTART COMBAT\n");
            for k in 0..3 {
                let n = (i32::from(id) + k * 5) % SECTORS;
                let target = id % SPECIES + 1;
                text.push_str(&format!(
                    "BATTLE {} {} {}\nWITHDRAW 20 30 60\nATTACK 0\nATTACK {}\nENGAGE 3\nENGAGE 1\nTARGET 2\n",
                    n,
                    n * 2,
                    n * 3,
                    species_name(target).to_lowercase()
                ));
            }
            text.push_str("END\n");
            (SpeciesId(id), text)
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let orders = crowded_orders();
    let text = &orders[&SpeciesId(1)];
    c.bench_function("tokenize_order_file", |b| b.iter(|| tokenize(black_box(text))));
}

fn bench_score(c: &mut Criterion) {
    c.bench_function("score_misspelled_name", |b| {
        b.iter(|| score(black_box("RASALHAGUE"), black_box("RASALHAGE")))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let g = crowded_galaxy();
    c.bench_function("resolve_name_60_species", |b| {
        b.iter(|| resolve_species(black_box(&g), black_box("tarazed22")))
    });
}

fn bench_compile_turn(c: &mut Criterion) {
    let g = crowded_galaxy();
    let orders = crowded_orders();
    let selection = default_selection(&g);
    let config = CompileConfig::default();

    c.bench_function("compile_60_species_turn", |b| {
        b.iter(|| {
            let mut working = g.clone();
            let mut rng = SmallRng::seed_from_u64(7);
            compile_rosters(
                &mut working,
                black_box(&orders),
                &selection,
                &config,
                &mut rng,
                &mut NullTranscript,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_score,
    bench_resolve,
    bench_compile_turn
);
criterion_main!(benches);
