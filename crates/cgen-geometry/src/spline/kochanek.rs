//! Kochanek–Bartels cubic.
//!
//! Each node gets an incoming and an outgoing tangent from the chords on
//! either side, shaped by bias, tension and continuity and rescaled for
//! unequal neighbouring intervals. Tangents are expressed per segment
//! (value change over a unit local parameter).

use super::{hermite, EndCondition, KochanekParams, Nodes};

pub(crate) fn coefficients(nodes: &Nodes<'_>, params: KochanekParams) -> Vec<[f64; 4]> {
    let segments = nodes.segment_count();
    let values = nodes.values;
    let mut incoming = vec![0.0; segments + 1];
    let mut outgoing = vec![0.0; segments + 1];

    if nodes.closed {
        for i in 0..segments {
            let prev = if i == 0 { segments - 1 } else { i - 1 };
            let (tin, tout) = node_tangents(
                values[i] - values[prev],
                values[i + 1] - values[i],
                nodes.interval(prev),
                nodes.interval(i),
                params,
            );
            incoming[i] = tin;
            outgoing[i] = tout;
        }
        incoming[segments] = incoming[0];
        outgoing[segments] = outgoing[0];
    } else {
        for i in 1..segments {
            let (tin, tout) = node_tangents(
                values[i] - values[i - 1],
                values[i + 1] - values[i],
                nodes.interval(i - 1),
                nodes.interval(i),
                params,
            );
            incoming[i] = tin;
            outgoing[i] = tout;
        }
        let (first, last) = end_tangents(nodes, &outgoing, &incoming);
        outgoing[0] = first;
        incoming[segments] = last;
    }

    (0..segments)
        .map(|i| hermite(values[i], values[i + 1], outgoing[i], incoming[i + 1]))
        .collect()
}

fn node_tangents(
    source_chord: f64,
    destination_chord: f64,
    h_prev: f64,
    h_next: f64,
    params: KochanekParams,
) -> (f64, f64) {
    let KochanekParams {
        bias: b,
        tension: t,
        continuity: c,
    } = params;

    let incoming = (1.0 - t) * (1.0 - c) * (1.0 + b) / 2.0 * source_chord
        + (1.0 - t) * (1.0 + c) * (1.0 - b) / 2.0 * destination_chord;
    let outgoing = (1.0 - t) * (1.0 + c) * (1.0 + b) / 2.0 * source_chord
        + (1.0 - t) * (1.0 - c) * (1.0 - b) / 2.0 * destination_chord;

    let span = h_prev + h_next;
    (incoming * 2.0 * h_prev / span, outgoing * 2.0 * h_next / span)
}

/// Outgoing tangent of the first node and incoming tangent of the last.
fn end_tangents(nodes: &Nodes<'_>, outgoing: &[f64], incoming: &[f64]) -> (f64, f64) {
    let segments = nodes.segment_count();
    let values = nodes.values;
    let h_first = nodes.interval(0);
    let h_last = nodes.interval(segments - 1);
    let chord_first = values[1] - values[0];
    let chord_last = values[segments] - values[segments - 1];

    let fixed = |condition: EndCondition, chord: f64, h: f64| match condition {
        EndCondition::Secant => Some(chord),
        EndCondition::Derivative(v) => Some(v * h),
        EndCondition::SecondDerivative(_) => None,
    };
    let mut first = fixed(nodes.left, chord_first, h_first);
    let mut last = fixed(nodes.right, chord_last, h_last);

    // opposite tangents of the end segments are interior nodes unless there
    // is only one segment
    let (left_opposite, right_opposite) = if segments > 1 {
        (Some(incoming[1]), Some(outgoing[segments - 1]))
    } else {
        (None, None)
    };

    let left_from = |m1: f64, v: f64| (3.0 * chord_first - m1 - v * h_first * h_first / 2.0) / 2.0;
    let right_from = |m0: f64, v: f64| (3.0 * chord_last - m0 + v * h_last * h_last / 2.0) / 2.0;

    match (nodes.left, nodes.right) {
        (EndCondition::SecondDerivative(vl), EndCondition::SecondDerivative(vr)) if segments == 1 => {
            let a = vl * h_first * h_first / 2.0;
            let b = vr * h_first * h_first / 2.0;
            let m0 = chord_first - (2.0 * a + b) / 3.0;
            first = Some(m0);
            last = Some(right_from(m0, vr));
        }
        _ => {
            if let EndCondition::SecondDerivative(v) = nodes.left {
                let m1 = left_opposite.or(last).unwrap_or(chord_first);
                first = Some(left_from(m1, v));
            }
            if let EndCondition::SecondDerivative(v) = nodes.right {
                let m0 = right_opposite.or(first).unwrap_or(chord_last);
                last = Some(right_from(m0, v));
            }
        }
    }

    (first.unwrap_or(chord_first), last.unwrap_or(chord_last))
}
