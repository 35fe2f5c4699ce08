//! Axis tick selection
//!
//! Steps are 1, 2 or 5 times a power of ten. Ticks lie inside the data range,
//! both ends included.

/// Ticks along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub step: f64,
    pub values: Vec<f64>,
}

impl Ticks {
    fn none() -> Self {
        Ticks {
            step: 0.0,
            values: Vec::new(),
        }
    }

    /// Labels for every tick, with as many decimals as the step needs
    pub fn labels(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|&v| format_tick(v, self.step))
            .collect()
    }
}

const EPS: f64 = 1e-9;

/// A 1-2-5 step giving roughly `target` intervals over `span`
pub fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

pub fn nice_ticks(min: f64, max: f64, target: usize) -> Ticks {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Ticks::none();
    }
    if max == min {
        return Ticks {
            step: 0.0,
            values: vec![min],
        };
    }

    let step = nice_step(max - min, target);
    let first = (min / step - EPS).ceil() as i64;
    let last = (max / step + EPS).floor() as i64;
    let values = (first..=last)
        .map(|k| {
            let v = k as f64 * step;
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect();

    Ticks { step, values }
}

/// Format a tick value with the decimals implied by the step
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10() - EPS).ceil().max(0.0) as usize
    };
    let text = format!("{:.*}", decimals, value);

    // "-0" / "-0.0" from values that round to zero
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}
