use modscope::{Scheme, Synthesizer};

/// Sign changes inside a window, ignoring samples that are numerically zero
fn sign_changes(window: &[f64]) -> usize {
    let signs: Vec<bool> = window
        .iter()
        .filter(|v| v.abs() > 1e-9)
        .map(|v| *v > 0.0)
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

fn main() {
    // usage: debug_modulation [SCHEME] [BITS] [FREQ] [AMP]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let scheme = args.first().map(String::as_str).unwrap_or("FSK");
    let bits = args.get(1).map(String::as_str).unwrap_or("10110");
    let frequency = args.get(2).and_then(|v| v.parse().ok()).unwrap_or(5.0);
    let amplitude = args.get(3).and_then(|v| v.parse().ok()).unwrap_or(5.0);

    let synth = Synthesizer::default();
    let outcome = scheme
        .parse::<Scheme>()
        .and_then(|scheme| Ok((scheme, modscope::parse(bits)?)))
        .and_then(|(scheme, symbols)| {
            Ok((symbols.clone(), synth.synthesize(&symbols, frequency, amplitude, scheme)?))
        });
    let (symbols, result) = match outcome {
        Ok(ok) => ok,
        Err(e) => {
            eprintln!("❌ {} ({})", e, e.kind());
            std::process::exit(1);
        }
    };

    let config = synth.config();
    let samples_per_bit = config.samples_per_bit;
    println!(
        "{} bits={} f={} Hz A={} -> {} samples ({} per bit, {} Hz)",
        scheme,
        symbols,
        frequency,
        amplitude,
        result.len(),
        samples_per_bit,
        synth.sample_rate(frequency)
    );
    println!(
        "fsk ratio {} | pwm duty {}/{} | ppm offset {}/{} width {}",
        config.fsk_space_ratio,
        config.pwm_duty_one,
        config.pwm_duty_zero,
        config.ppm_offset_one,
        config.ppm_offset_zero,
        config.ppm_pulse_width
    );
    println!("{:>4} {:>4} {:>10} {:>6} {:>6}", "bit", "val", "peak", "high", "flips");

    for (i, bit) in symbols.iter().enumerate() {
        let window = &result.modulated[i * samples_per_bit..(i + 1) * samples_per_bit];
        let peak = window.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let high = window
            .iter()
            .filter(|v| (**v - amplitude).abs() < 1e-9)
            .count();
        println!(
            "{:>4} {:>4} {:>10.4} {:>6} {:>6}",
            i,
            bit.as_char(),
            peak,
            high,
            sign_changes(window)
        );
    }
}
