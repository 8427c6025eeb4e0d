use modscope::{Bit, Scheme, SymbolSequence, SynthConfig, SynthError, Synthesizer, parse, synthesize};
use pretty_assertions::assert_eq;

const S: usize = 100;

fn bits(text: &str) -> SymbolSequence {
    parse(text).expect("valid bitstream")
}

fn sign_changes(window: &[f64]) -> usize {
    let signs: Vec<bool> = window
        .iter()
        .filter(|v| v.abs() > 1e-9)
        .map(|v| *v > 0.0)
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

#[test]
fn every_scheme_produces_aligned_series() {
    let symbols = bits("00111001");
    for scheme in Scheme::ALL {
        let result = synthesize(&symbols, 5.0, 2.0, scheme).unwrap();
        assert_eq!(result.len(), symbols.len() * S, "{scheme}");
        for (name, series) in result.series() {
            assert_eq!(series.len(), result.len(), "{scheme} {name}");
            assert!(series.iter().all(|v| v.is_finite()), "{scheme} {name}");
        }
        assert_eq!(result.time[0], 0.0);
        assert!(result.time.windows(2).all(|w| w[1] > w[0]), "{scheme}");
        // last sample sits one step before the end of the bitstream
        let end = symbols.len() as f64 / 5.0;
        assert!(result.time[result.len() - 1] < end);
    }
}

#[test]
fn synthesis_is_deterministic() {
    let symbols = bits("1011001110");
    for scheme in Scheme::ALL {
        let a = synthesize(&symbols, 3.0, 1.5, scheme).unwrap();
        let b = synthesize(&symbols, 3.0, 1.5, scheme).unwrap();
        assert_eq!(a, b, "{scheme}");
    }
}

#[test]
fn single_one_bit_ask() {
    let result = synthesize(&bits("1"), 5.0, 5.0, Scheme::Ask).unwrap();
    assert_eq!(result.len(), S);
    assert!((result.time[S - 1] - 0.198).abs() < 1e-12);
    assert!(result.digital.iter().all(|v| *v == 5.0));
    assert_eq!(result.modulated, result.carrier);
    // quarter period: carrier peak
    assert!((result.carrier[25] - 5.0).abs() < 1e-9);
}

#[test]
fn ask_zeros_are_silent() {
    let result = synthesize(&bits("0000"), 7.0, 3.0, Scheme::Ask).unwrap();
    assert!(result.modulated.iter().all(|v| *v == 0.0));
    assert!(result.digital.iter().all(|v| *v == 0.0));
    // carrier keeps running regardless of the data
    assert!(result.carrier.iter().any(|v| v.abs() > 1.0));
}

#[test]
fn psk_inverted_bits_negate_the_output() {
    let symbols = bits("1101000111");
    let a = synthesize(&symbols, 4.0, 2.0, Scheme::Psk).unwrap();
    let b = synthesize(&symbols.inverted(), 4.0, 2.0, Scheme::Psk).unwrap();
    for (x, y) in a.modulated.iter().zip(&b.modulated) {
        assert!((x + y).abs() < 1e-9, "{x} vs {y}");
    }
    assert_eq!(a.carrier, b.carrier);
}

#[test]
fn pam_follows_the_digital_waveform() {
    let result = synthesize(&bits("0110101"), 2.0, 4.0, Scheme::Pam).unwrap();
    assert_eq!(result.modulated, result.digital);
}

#[test]
fn fsk_uses_two_tones_with_per_bit_phase() {
    let result = synthesize(&bits("10110"), 5.0, 5.0, Scheme::Fsk).unwrap();
    let window = |i: usize| &result.modulated[i * S..(i + 1) * S];

    // '1': one full mark cycle, '0': half a space cycle
    assert_eq!(sign_changes(window(0)), 1);
    assert_eq!(sign_changes(window(1)), 0);
    assert_eq!(sign_changes(window(2)), 1);
    assert_eq!(sign_changes(window(4)), 0);

    // every window restarts at phase zero
    for i in 0..5 {
        assert!(window(i)[0].abs() < 1e-12);
    }
    // equal bits give identical windows
    assert_eq!(window(0), window(2));
    assert_eq!(window(1), window(4));
}

#[test]
fn pwm_duty_cycles() {
    let amplitude = 2.0;
    let result = synthesize(&bits("10"), 5.0, amplitude, Scheme::Pwm).unwrap();
    let high = |i: usize| {
        result.modulated[i * S..(i + 1) * S]
            .iter()
            .filter(|v| **v == amplitude)
            .count()
    };
    assert_eq!(high(0), 75);
    assert_eq!(high(1), 25);
    // high part comes first
    assert_eq!(result.modulated[0], amplitude);
    assert_eq!(result.modulated[S - 1], 0.0);
}

#[test]
fn ppm_has_one_pulse_per_bit() {
    let amplitude = 3.0;
    let result = synthesize(&bits("10"), 5.0, amplitude, Scheme::Ppm).unwrap();
    for (i, start) in [(0, 60), (1, 10)] {
        let window = &result.modulated[i * S..(i + 1) * S];
        let high: Vec<usize> = window
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == amplitude)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(high, (start..start + 10).collect::<Vec<_>>());
        assert!(window.iter().all(|v| *v == 0.0 || *v == amplitude));
    }
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(parse("102"), Err(SynthError::InvalidBitstream(_))));
    assert!(matches!(parse(""), Err(SynthError::InvalidBitstream(_))));
    assert!(matches!(
        "XYZ".parse::<Scheme>(),
        Err(SynthError::UnsupportedScheme(_))
    ));

    let symbols = bits("101");
    for (frequency, amplitude) in [(0.0, 1.0), (-5.0, 1.0), (f64::NAN, 1.0), (5.0, 0.0)] {
        assert!(
            matches!(
                synthesize(&symbols, frequency, amplitude, Scheme::Ask),
                Err(SynthError::InvalidParameter { .. })
            ),
            "f={frequency} a={amplitude}"
        );
    }
}

#[test]
fn extreme_frequency_keeps_every_series_finite() {
    let symbols = bits("10");
    for scheme in Scheme::ALL {
        let result = synthesize(&symbols, 1e308, 1.0, scheme).unwrap();
        for (name, series) in result.series() {
            assert!(
                series.iter().all(|v| v.is_finite()),
                "{scheme} {name} has non-finite samples"
            );
        }
        // a quarter period in, the carrier is at its peak
        assert!((result.carrier[25] - 1.0).abs() < 1e-6, "{scheme}");
    }
}

#[test]
fn custom_config_changes_resolution() {
    let config = SynthConfig {
        samples_per_bit: 20,
        ..SynthConfig::default()
    };
    let synth = Synthesizer::new(config).unwrap();
    let result = synth.synthesize(&bits("101"), 10.0, 1.0, Scheme::Pwm).unwrap();
    assert_eq!(result.len(), 60);
    assert_eq!(synth.sample_rate(10.0), 200.0);
    assert_eq!(
        result.modulated[..20].iter().filter(|v| **v == 1.0).count(),
        15
    );
}

#[test]
fn bit_helpers() {
    let symbols = bits("10");
    assert_eq!(symbols.as_slice(), &[Bit::One, Bit::Zero]);
    assert_eq!(symbols.inverted().to_string(), "01");
}
