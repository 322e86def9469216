//! User corrections applied on top of an automatic mapping result.

use hcm_model::{Mapping, MappingResult};

use crate::error::{MapError, Result};

/// Assign `source` to `target` with method `manual` and confidence 1.0.
///
/// Any existing mapping that uses either `source` or `target` is removed
/// first, so each stays in at most one mapping. Both names must belong to
/// the result.
pub fn set_manual_mapping(result: &mut MappingResult, source: &str, target: &str) -> Result<()> {
    ensure_source(result, source)?;
    if !result.has_target(target) {
        return Err(MapError::TargetFieldNotFound {
            name: target.to_string(),
            entity: result.entity.clone(),
        });
    }

    result
        .mappings
        .retain(|m| m.source != source && m.target != target);
    result.mappings.push(Mapping::manual(source, target));
    result.refresh_unmapped();

    tracing::debug!(source, target, "manual mapping set");
    Ok(())
}

/// Remove the mapping for `source`, returning it to the unmapped lists.
///
/// Returns the removed mapping, or `None` when `source` was not mapped.
pub fn clear_mapping(result: &mut MappingResult, source: &str) -> Result<Option<Mapping>> {
    ensure_source(result, source)?;
    let position = result.mappings.iter().position(|m| m.source == source);
    let removed = position.map(|idx| result.mappings.remove(idx));
    result.refresh_unmapped();
    Ok(removed)
}

fn ensure_source(result: &MappingResult, source: &str) -> Result<()> {
    if result.has_source(source) {
        Ok(())
    } else {
        Err(MapError::SourceFieldNotFound {
            name: source.to_string(),
        })
    }
}
