//! Demonstration of VoronoiDiagram generation and usage

use rust_voronoi_planar::*;

fn main() -> Result<()> {
    println!("Generating diagram...");

    let sites = generation::random_sites(2_000, 1920.0, 1080.0, 42);

    let config = DiagramConfigBuilder::new()
        .seed(42)
        .duplicates(DuplicatePolicy::Jitter { max_offset: 1e-6 })?
        .verbose(true)
        .build()?;

    let diagram = VoronoiDiagram::generate(sites, &config)?;

    println!("Generated {} faces", diagram.face_count());
    println!("Hull: {} sites", diagram.hull().len());

    // Edge count distribution
    let mut counts = std::collections::BTreeMap::new();
    for face in diagram.faces() {
        *counts.entry(face.edge_count()).or_insert(0usize) += 1;
    }

    println!("\nEdges per face:");
    for (edges, count) in &counts {
        let pct = (*count as f32 / diagram.face_count() as f32) * 100.0;
        println!("  {:2}: {} ({:.1}%)", edges, count, pct);
    }

    let bounded = diagram.faces().filter(|face| face.is_bounded()).count();
    println!("\nBounded faces: {}", bounded);

    // Test spatial index if available
    #[cfg(feature = "spatial-index")]
    {
        let pos = DVec2::new(960.0, 540.0);
        if let Some(face_id) = diagram.find_face_at(pos) {
            println!("\nPosition {:?} is in face {}", pos, face_id);

            let cell = diagram.cell(face_id)?;
            println!("Face {} has {} neighbors", face_id, cell.neighbor_count());
            if let Some(area) = cell.area() {
                println!("Face {} covers {:.1} square units", face_id, area);
            }

            let nearby = diagram.find_faces_within_hops(face_id, 2);
            println!("Found {} faces within 2 hops of face {}", nearby.len(), face_id);
        }
    }

    Ok(())
}
