//! Topology reconciliation
//!
//! A stored topology cannot be re-applied verbatim: the OS reassigns the low
//! half of every adapter id on boot, and the high bits of target ids along
//! with them. Only a path's source id and the low 16 bits of its target id
//! survive. Reconciliation re-derives the volatile fields from a freshly
//! queried live topology while keeping the stored topology's semantic wiring
//! (which source feeds which physical output, at which mode).
//!
//! Matching is first-match-wins in array order. Duplicate low-16-bit target
//! ids among live paths are not disambiguated further; that is long-standing
//! behavior profiles depend on, kept as-is. Records with no live counterpart
//! (e.g. a disconnected monitor) pass through untouched and are diagnosed by
//! the OS at apply time.

use super::model::{same_output, Topology};

/// Rewrite the volatile identifier fields of `stored` using `live`.
///
/// Pure and infallible: unmatched paths and modes are returned unchanged.
/// Applying the result twice against the same live topology is a no-op.
pub fn reconcile(stored: Topology, live: &Topology) -> Topology {
    let mut patched = stored;

    // Path pass: adopt the live target id and adapter id halves for every
    // stored path whose (source id, target low bits) pair is present live.
    for path in &mut patched.paths {
        for current in &live.paths {
            if path.source.id == current.source.id
                && same_output(path.target.id, current.target.id)
            {
                path.target.id = current.target.id;
                path.source.adapter_id.low = current.source.adapter_id.low;
                path.target.adapter_id.low = current.target.adapter_id.low;
                break;
            }
        }
    }

    // Mode pass: target modes adopt the patched id and adapter low bits of
    // their owning path. The sibling source mode is located by the owning
    // path's source id together with the target mode's pre-patch adapter low
    // bits, which still identify the pairing at this point.
    for i in 0..patched.modes.len() {
        if !patched.modes[i].is_target() {
            continue;
        }
        let mode_id = patched.modes[i].id;
        let Some(owner) = patched
            .paths
            .iter()
            .copied()
            .find(|p| same_output(mode_id, p.target.id))
        else {
            continue;
        };

        patched.modes[i].id = owner.target.id;

        let pair_low = patched.modes[i].adapter_id.low;
        if let Some(sibling) = patched.modes.iter_mut().find(|s| {
            s.id == owner.source.id && s.adapter_id.low == pair_low && s.is_source()
        }) {
            sibling.adapter_id.low = owner.source.adapter_id.low;
        }

        patched.modes[i].adapter_id.low = owner.target.adapter_id.low;
    }

    patched
}
