//! Weighted category and template selection.

use crate::catalog::{Catalog, EventTemplate};
use crate::config::{EventConfig, GoldenAgeGate};
use sim_core::{Axis, Country, EventKind, RandomSource};

/// Whether a country may receive a golden-age event this week.
pub fn golden_age_open(country: &Country, week: u32, gate: &GoldenAgeGate) -> bool {
    if country.golden_age.activated || week < gate.min_weeks {
        return false;
    }
    let stats = &country.stats;
    if stats.count_at_least(gate.high_axis_level) < gate.min_high_axes {
        return false;
    }
    if stats.lowest().1 <= gate.low_axis_level {
        return false;
    }
    stats.average() <= gate.average_ceiling_base + f64::from(week) * gate.average_ceiling_per_week
}

/// Re-weighted category table for `country`. Categories without an
/// eligible template are left out.
pub fn category_weights(country: &Country, week: u32, cfg: &EventConfig, catalog: &Catalog) -> Vec<(EventKind, f64)> {
    let stats = &country.stats;
    let focused = |axis: Axis| stats.get(axis) >= cfg.focus_level;
    let mut table = Vec::with_capacity(EventKind::GENERATED.len());
    for kind in EventKind::GENERATED {
        let base = cfg.weight(kind);
        if base <= 0.0 || !catalog.of_kind(kind).any(|t| t.is_eligible(country)) {
            continue;
        }
        let weight = match kind {
            EventKind::Crisis if stats.average() < cfg.crisis_average_floor => base * cfg.crisis_suppression,
            EventKind::Discovery | EventKind::Technological if focused(Axis::Science) => base * cfg.focus_boost,
            EventKind::Cultural if focused(Axis::Culture) => base * cfg.focus_boost,
            EventKind::Financial if focused(Axis::Economy) => base * cfg.focus_boost,
            EventKind::Inspiration => {
                if !golden_age_open(country, week, &cfg.golden_age) {
                    continue;
                }
                base / (1.0 + stats.highest().1 / 10.0) / (1.0 + f64::from(week) / 52.0)
            }
            _ => base,
        };
        if weight > 0.0 {
            table.push((kind, weight));
        }
    }
    table
}

/// Draw one template for `country`, or `None` when nothing is eligible.
pub fn pick_template<'a, R: RandomSource>(
    country: &Country,
    week: u32,
    cfg: &EventConfig,
    catalog: &'a Catalog,
    rng: &mut R,
) -> Option<&'a EventTemplate> {
    let table = category_weights(country, week, cfg, catalog);
    let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
    let (kind, _) = table[rng.weighted_index(&weights)?];
    let candidates: Vec<&EventTemplate> = catalog.of_kind(kind).filter(|t| t.is_eligible(country)).collect();
    let weights: Vec<f64> = candidates.iter().map(|t| t.rarity.weight()).collect();
    let idx = rng.weighted_index(&weights)?;
    candidates.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{CountryId, CountrySeed, ScriptedRng};

    fn country_with(levels: [f64; 5]) -> Country {
        let mut c = Country::new(CountryId(1), "Test", false, &CountrySeed::default());
        for (axis, v) in Axis::ALL.into_iter().zip(levels) {
            c.stats.set(axis, v);
        }
        c
    }

    fn weight_of(table: &[(EventKind, f64)], kind: EventKind) -> Option<f64> {
        table.iter().find(|(k, _)| *k == kind).map(|(_, w)| *w)
    }

    #[test]
    fn golden_age_gate_blocks_early_lump_allocations() {
        let gate = GoldenAgeGate::default();
        let c = country_with([7.0, 7.0, 7.0, 3.0, 3.0]);
        assert!(!golden_age_open(&c, 19, &gate));
        assert!(golden_age_open(&c, 20, &gate));

        let lopsided = country_with([7.0, 7.0, 7.0, 2.0, 9.0]);
        assert!(!golden_age_open(&lopsided, 40, &gate));

        // average 15 exceeds 8 + 20/20 at week 20 but not 8 + 160/20 at week 160
        let rich = country_with([15.0; 5]);
        assert!(!golden_age_open(&rich, 20, &gate));
        assert!(golden_age_open(&rich, 160, &gate));

        let mut done = c.clone();
        done.golden_age.activated = true;
        assert!(!golden_age_open(&done, 40, &gate));
    }

    #[test]
    fn low_average_suppresses_crisis() {
        let cfg = EventConfig::default();
        let cat = Catalog::default();
        let weak = country_with([1.0, 1.0, 1.0, 1.0, 2.0]);
        let table = category_weights(&weak, 4, &cfg, &cat);
        assert!((weight_of(&table, EventKind::Crisis).unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(weight_of(&table, EventKind::Inspiration), None);
        // no personage focus reaches 3 yet, but the wandering scholar is ungated
        assert_eq!(weight_of(&table, EventKind::Personage), Some(20.0));

        let steady = country_with([4.0; 5]);
        let table = category_weights(&steady, 4, &cfg, &cat);
        assert_eq!(weight_of(&table, EventKind::Crisis), Some(15.0));
    }

    #[test]
    fn focused_axes_boost_their_categories() {
        let cfg = EventConfig::default();
        let cat = Catalog::default();
        let c = country_with([0.0, 0.0, 5.0, 5.0, 5.0]);
        let table = category_weights(&c, 4, &cfg, &cat);
        assert_eq!(weight_of(&table, EventKind::Discovery), Some(22.5));
        assert_eq!(weight_of(&table, EventKind::Technological), Some(22.5));
        assert_eq!(weight_of(&table, EventKind::Cultural), Some(22.5));
        assert_eq!(weight_of(&table, EventKind::Financial), Some(15.0));
    }

    #[test]
    fn inspiration_weight_decays_with_peak_stat_and_time() {
        let cfg = EventConfig::default();
        let cat = Catalog::default();
        let c = country_with([6.0, 6.0, 6.0, 6.0, 6.0]);
        let table = category_weights(&c, 52, &cfg, &cat);
        let w = weight_of(&table, EventKind::Inspiration).unwrap();
        assert!((w - 5.0 / 1.6 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn pick_respects_template_conditions() {
        let cfg = EventConfig {
            weights: [(EventKind::Milestone, 1.0)].into_iter().collect(),
            ..EventConfig::default()
        };
        let cat = Catalog::default();
        let mut rng = ScriptedRng::constant(0.0);
        let low = country_with([0.0; 5]);
        assert!(pick_template(&low, 8, &cfg, &cat, &mut rng).is_none());

        let scholar = country_with([0.0, 0.0, 0.0, 5.0, 0.0]);
        let t = pick_template(&scholar, 8, &cfg, &cat, &mut rng).unwrap();
        assert_eq!(t.key, "printing_press");
    }
}
