use proptest::prelude::*;
use theta_indicators::{
    ADX, ATR, BollingerBands, CCI, EMA, Indicator, IntoMultiVecs, MACD, MultiOutputIndicator, OBV,
    ParabolicSar, RSI, SMA, Stochastic, SuperTrend, VWAP,
};
use theta_types::Bar;

fn bar_sequence(len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((50.0f64..150.0, 0.01f64..3.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..500.0), len..=len)
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (mid, spread, open_pos, close_pos, volume))| {
                    let low = mid - spread;
                    let high = mid + spread;
                    let open = (low + open_pos * 2.0 * spread).min(high);
                    let close = (low + close_pos * 2.0 * spread).min(high);
                    Bar::new(i as i64 * 60_000_000_000, open, high, low, close, volume)
                })
                .collect()
        })
}

fn single_outputs() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(SMA::new(10)),
        Box::new(EMA::new(10)),
        Box::new(RSI::new(14)),
        Box::new(ATR::new(14)),
        Box::new(CCI::new(20)),
        Box::new(OBV),
        Box::new(VWAP::rolling(20)),
    ]
}

proptest! {
    #[test]
    fn prop_outputs_align_with_input(bars in bar_sequence(60)) {
        for indicator in single_outputs() {
            let values = indicator.compute(&bars);
            prop_assert_eq!(values.len(), bars.len(), "{}", indicator.name());
            let warmup = indicator.warmup_periods();
            prop_assert!(values[warmup - 1..].iter().any(|v| v.is_finite()), "{}", indicator.name());
            prop_assert!(values.iter().all(|v| !v.is_infinite()));
        }

        let multi: Vec<Vec<Vec<f64>>> = vec![
            BollingerBands::new(20, 2.0).compute_all(&bars).into_vecs(),
            Stochastic::new(14, 3).compute_all(&bars).into_vecs(),
            ADX::new(14).compute_all(&bars).into_vecs(),
            ParabolicSar::new(0.02, 0.2).compute_all(&bars).into_vecs(),
            SuperTrend::new(10, 3.0).compute_all(&bars).into_vecs(),
            MACD::new(12, 26, 9).compute_all(&bars).into_vecs(),
        ];
        for outputs in multi {
            for series in outputs {
                prop_assert_eq!(series.len(), bars.len());
            }
        }
    }

    #[test]
    fn prop_oscillators_bounded(bars in bar_sequence(80)) {
        let rsi = RSI::new(14).compute(&bars);
        let stoch = Stochastic::new(14, 3).compute_all(&bars);
        for v in rsi.iter().chain(&stoch.k).chain(&stoch.d).filter(|v| v.is_finite()) {
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(v));
        }
    }

    #[test]
    fn prop_deterministic(bars in bar_sequence(40)) {
        let a = ADX::new(7).compute_all(&bars).into_vecs();
        let b = ADX::new(7).compute_all(&bars).into_vecs();
        for (x, y) in a.iter().zip(&b) {
            for (p, q) in x.iter().zip(y) {
                prop_assert!(p.to_bits() == q.to_bits());
            }
        }
    }
}
