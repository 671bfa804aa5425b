//! Fleet reads that combine the ship registry with the core game.

use armada_chain::{Address, U256};

use crate::contracts::{CoreGame, ShipRegistry};
use crate::core::error::Result;
use crate::core::types::{Faction, ShipInfo};

/// Level and faction for each id, in input order.
///
/// Tries the batched `getLevelsAndFactions` read first. If that fails, reads
/// each ship on its own, best effort: if either read for a ship fails, that
/// ship gets level 0 and [`Faction::Unknown`] instead of failing the batch.
pub async fn batch_level_and_faction(core_game: &CoreGame, ids: &[U256]) -> Vec<(u8, Faction)> {
    if ids.is_empty() {
        return Vec::new();
    }

    match core_game.levels_and_factions(ids).await {
        Ok(details) => return details,
        Err(e) => tracing::debug!(error = %e, "batched read failed, reading ships one by one"),
    }

    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        let details = match ship_details(core_game, id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::debug!(%id, error = %e, "ship read failed");
                (0, Faction::Unknown)
            }
        };
        out.push(details);
    }

    out
}

async fn ship_details(core_game: &CoreGame, id: U256) -> Result<(u8, Faction)> {
    let level = core_game.level_of(id).await?;
    let faction = core_game.faction_of(id).await?;
    Ok((level, faction))
}

/// Ships owned by `owner`, with level and faction filled in.
pub async fn load_fleet(
    registry: &ShipRegistry,
    core_game: &CoreGame,
    owner: Address,
) -> Result<Vec<ShipInfo>> {
    let ids = registry.ships_of_owner_optimized(owner).await?;
    let details = batch_level_and_faction(core_game, &ids).await;

    Ok(ids
        .into_iter()
        .zip(details)
        .map(|(id, (level, faction))| ShipInfo::new(id, level, faction))
        .collect())
}
