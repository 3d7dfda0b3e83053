//! Builders for ready-meshed objects.

mod make_box;
mod make_plate;

pub use make_box::MakeBox;
pub use make_plate::MakePlate;

use crate::error::MeshError;
use crate::mesh::Mesh;

fn check_divisions(divisions: &[usize]) -> Result<(), MeshError> {
    if divisions.contains(&0) {
        return Err(MeshError::Degenerate(format!(
            "mesh divisions must be at least 1, got {divisions:?}"
        )));
    }
    Ok(())
}

/// Adds one feature edge per consecutive node pair of `chain`.
fn add_chain_edges(mesh: &mut Mesh, chain: &[usize], gid: usize) -> Result<(), MeshError> {
    for pair in chain.windows(2) {
        mesh.add_edge([pair[0], pair[1]], Some(gid))?;
    }
    Ok(())
}
