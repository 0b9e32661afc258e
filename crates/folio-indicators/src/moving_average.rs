//! Simple and exponential moving averages.

use folio_core::TimeSeries;

/// Simple moving average with a running window sum.
///
/// Slot `i` is `None` while `i < period - 1`, and for any window that holds a
/// non-finite value. A zero period yields an all-`None` series.
pub fn sma(values: &[f64], period: usize) -> TimeSeries<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return TimeSeries::empty(n);
    }

    let mut out = Vec::with_capacity(n);
    let mut sum = 0.0;
    let mut invalid = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if value.is_finite() {
            sum += value;
        } else {
            invalid += 1;
        }

        if i >= period {
            let leaving = values[i - period];
            if leaving.is_finite() {
                sum -= leaving;
            } else {
                invalid -= 1;
            }
        }

        if i + 1 >= period && invalid == 0 {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }

    TimeSeries::from_options(out)
}

/// Exponential moving average, `k = 2 / (period + 1)`.
///
/// Seeded with the first defined value. A missing (or non-finite) input holds
/// the previous average rather than opening a gap.
pub fn ema<V>(values: &[V], period: usize) -> TimeSeries<f64>
where
    V: Copy + Into<Option<f64>>,
{
    if period == 0 {
        return TimeSeries::empty(values.len());
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;
    let out = values
        .iter()
        .map(|&v| {
            let v: Option<f64> = v.into();
            let next = match (prev, v.filter(|x| x.is_finite())) {
                (None, current) => current,
                (Some(p), Some(x)) => Some(p + k * (x - p)),
                (Some(p), None) => Some(p),
            };
            prev = next;
            next
        })
        .collect();

    TimeSeries::from_options(out)
}

/// One SMA series per requested period, in request order.
pub fn moving_averages(closes: &[f64], periods: &[usize]) -> Vec<(usize, TimeSeries<f64>)> {
    periods.iter().map(|&p| (p, sma(closes, p))).collect()
}
