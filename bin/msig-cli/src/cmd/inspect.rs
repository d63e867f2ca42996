use msig_codec::{decode, AggregateShape, DecodedAggregate};

use crate::args::SubcInspect;

pub(super) fn run(subc: SubcInspect) -> anyhow::Result<DecodedAggregate> {
    let shape = if subc.final_blob {
        AggregateShape::Final
    } else {
        AggregateShape::Proposal
    };
    Ok(decode(&subc.blob, shape, subc.count)?)
}
