//! Low/base/high valuation band derived from comparable sale prices.

pub mod import;

use serde::{Deserialize, Serialize};

use crate::contracts::ParcelSummary;

pub const LOW_FACTOR: f64 = 0.95;
pub const HIGH_FACTOR: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationBand {
    pub low: i64,
    pub base: i64,
    pub high: i64,
}

/// Estimates a band from the mean sale price of `comps`.
///
/// Comparables without a usable price (absent, zero, or not finite) are left
/// out of the sample rather than counted as zero. Returns `None` when no
/// comparable contributes a price.
pub fn estimate_band<'a, I>(comps: I) -> Option<ValuationBand>
where
    I: IntoIterator<Item = &'a ParcelSummary>,
{
    let (sum, count) = comps
        .into_iter()
        .filter_map(usable_price)
        .fold((0.0_f64, 0_u32), |(sum, count), price| (sum + price, count + 1));

    if count == 0 {
        return None;
    }

    let mean = sum / f64::from(count);
    Some(ValuationBand {
        low: round_to_whole(mean * LOW_FACTOR),
        base: round_to_whole(mean),
        high: round_to_whole(mean * HIGH_FACTOR),
    })
}

fn usable_price(parcel: &ParcelSummary) -> Option<f64> {
    parcel
        .last_sale_price
        .filter(|price| price.is_finite() && *price != 0.0)
}

// Half-way cases round away from zero.
fn round_to_whole(value: f64) -> i64 {
    value.round() as i64
}

/// Caches the band for one selection revision and recomputes on mismatch.
#[derive(Debug, Default)]
pub struct ValuationMemo {
    cached: Option<(u64, Option<ValuationBand>)>,
    computations: u64,
}

impl ValuationMemo {
    pub fn get(&mut self, revision: u64, comps: &[ParcelSummary]) -> Option<ValuationBand> {
        if let Some((cached_revision, band)) = self.cached {
            if cached_revision == revision {
                return band;
            }
        }

        let band = estimate_band(comps);
        self.computations += 1;
        self.cached = Some((revision, band));
        band
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(id: &str, price: Option<f64>) -> ParcelSummary {
        ParcelSummary {
            last_sale_price: price,
            ..ParcelSummary::new(id)
        }
    }

    #[test]
    fn empty_selection_has_no_band() {
        assert_eq!(estimate_band(&Vec::<ParcelSummary>::new()), None);
    }

    #[test]
    fn comps_without_prices_have_no_band() {
        let comps = vec![
            comp("a", None),
            comp("b", Some(0.0)),
            comp("c", Some(f64::NAN)),
        ];
        assert_eq!(estimate_band(&comps), None);
    }

    #[test]
    fn band_spans_five_percent_either_side_of_mean() {
        let comps = vec![
            comp("a", Some(400_000.0)),
            comp("b", Some(500_000.0)),
            comp("c", Some(600_000.0)),
        ];
        assert_eq!(
            estimate_band(&comps),
            Some(ValuationBand {
                low: 475_000,
                base: 500_000,
                high: 525_000,
            })
        );
    }

    #[test]
    fn single_comparable_degenerates_cleanly() {
        let comps = vec![comp("a", Some(300_000.0))];
        assert_eq!(
            estimate_band(&comps),
            Some(ValuationBand {
                low: 285_000,
                base: 300_000,
                high: 315_000,
            })
        );
    }

    #[test]
    fn unpriced_comparables_do_not_drag_the_mean() {
        let comps = vec![
            comp("a", Some(800_000.0)),
            comp("b", None),
            comp("c", Some(0.0)),
            comp("d", Some(900_000.0)),
        ];
        let band = estimate_band(&comps).expect("band available");
        assert_eq!(band.base, 850_000);
        assert_eq!(band.low, 807_500);
        assert_eq!(band.high, 892_500);
    }

    #[test]
    fn fractional_means_round_to_nearest_dollar() {
        let comps = vec![comp("a", Some(100_001.0)), comp("b", Some(100_002.0))];
        let band = estimate_band(&comps).expect("band available");
        assert_eq!(band.base, 100_002);
        assert_eq!(band.low, 95_001);
        assert_eq!(band.high, 105_002);
    }

    #[test]
    fn memo_recomputes_only_when_revision_changes() {
        let mut memo = ValuationMemo::default();
        let comps = vec![comp("a", Some(300_000.0))];

        let first = memo.get(1, &comps);
        let second = memo.get(1, &comps);
        assert_eq!(first, second);
        assert_eq!(memo.computations(), 1);

        let more = vec![comp("a", Some(300_000.0)), comp("b", Some(500_000.0))];
        let band = memo.get(2, &more).expect("band available");
        assert_eq!(band.base, 400_000);
        assert_eq!(memo.computations(), 2);
    }
}
