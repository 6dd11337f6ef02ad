//! Rewriting hmtx and hhea for a subset plan.

use sfnt_read::tables::hmtx::LongMetric;
use sfnt_read::{FontRef, TableProvider};
use sfnt_write::tables::hmtx::Hmtx;
use sfnt_write::FontBuilder;

use crate::{Plan, SubsetError};

/// Collect metrics for the retained glyphs and trim the trailing run of
/// equal advances down to bare side bearings, updating hhea to match.
pub(crate) fn subset_hmtx_hhea(
    font: &FontRef,
    plan: &Plan,
    builder: &mut FontBuilder,
) -> Result<(), SubsetError> {
    let hmtx = font.hmtx()?;
    let mut metrics = Vec::with_capacity(plan.new_to_old().len());
    for &old in plan.new_to_old() {
        metrics.push(LongMetric {
            advance: hmtx.advance(old)?,
            side_bearing: hmtx.side_bearing(old)?,
        });
    }

    let mut keep = metrics.len();
    while keep > 1 && metrics[keep - 1].advance == metrics[keep - 2].advance {
        keep -= 1;
    }
    let left_side_bearings = metrics
        .split_off(keep)
        .into_iter()
        .map(|metric| metric.side_bearing)
        .collect();
    let hmtx = Hmtx::new(metrics, left_side_bearings);

    let mut hhea = font.hhea()?;
    hhea.number_of_h_metrics = hmtx.number_of_h_metrics();
    builder.add_table(&hmtx)?;
    builder.add_table(&hhea)?;
    Ok(())
}
