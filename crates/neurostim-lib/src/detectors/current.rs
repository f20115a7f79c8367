use crate::signal::{AnnotatedSample, CurrentLevel, Sample};

/// Rule thresholds. Voltages in µV, frequencies in Hz, durations in seconds.
const BURST_FREQ_HZ: f64 = 20.0;
const SUSTAINED_FREQ_HZ: f64 = 50.0;
const FAST_WAVE_FREQ_HZ: f64 = 70.0;
const HIGH_AMPLITUDE_UV: f64 = 200.0;
const LONG_DISCHARGE_S: f64 = 10.0;
const MEDIUM_SPIKE_UV: f64 = 100.0;
const SMALL_SPIKE_UV: f64 = 50.0;

/// Select the stimulation level for one measurement.
///
/// Rules are tried in order and the first match wins:
/// 1. `High` for a paroxysmal burst (> 20 Hz, > 200 µV, > 10 s), a sustained
///    high-frequency discharge (> 50 Hz for > 10 s), or an abnormal fast wave
///    (> 70 Hz, > 200 µV).
/// 2. `Medium` for a large spike, `100 <= voltage < 200`.
/// 3. `Low` for a small spike, `50 <= voltage < 100`.
/// 4. `None` otherwise.
///
/// Voltage is compared signed, so negative excursions never select a level
/// through the amplitude bands. Any comparison against NaN is false, which
/// lands on `None`.
pub fn classify(voltage: f64, frequency: f64, duration: f64) -> CurrentLevel {
    let paroxysmal_burst = frequency > BURST_FREQ_HZ
        && voltage > HIGH_AMPLITUDE_UV
        && duration > LONG_DISCHARGE_S;
    let sustained_discharge = frequency > SUSTAINED_FREQ_HZ && duration > LONG_DISCHARGE_S;
    let fast_wave = frequency > FAST_WAVE_FREQ_HZ && voltage > HIGH_AMPLITUDE_UV;

    if paroxysmal_burst || sustained_discharge || fast_wave {
        CurrentLevel::High
    } else if (MEDIUM_SPIKE_UV..HIGH_AMPLITUDE_UV).contains(&voltage) {
        CurrentLevel::Medium
    } else if (SMALL_SPIKE_UV..MEDIUM_SPIKE_UV).contains(&voltage) {
        CurrentLevel::Low
    } else {
        CurrentLevel::None
    }
}

pub fn classify_sample(sample: &Sample) -> CurrentLevel {
    classify(sample.voltage, sample.frequency, sample.duration)
}

/// Classify every sample, preserving order.
pub fn classify_samples(samples: &[Sample]) -> Vec<AnnotatedSample> {
    samples
        .iter()
        .map(|sample| AnnotatedSample {
            sample: *sample,
            level: classify_sample(sample),
        })
        .collect()
}
