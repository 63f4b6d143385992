use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_voronoi_planar::generation::random_sites;
use rust_voronoi_planar::geometry::orientation;
use rust_voronoi_planar::{DVec2, DiagramConfigBuilder, VoronoiDiagram};

const SIZES: [usize; 10] = [3, 4, 5, 6, 7, 10, 31, 64, 100, 300];
const SEEDS: [u32; 3] = [1, 42, 2024];

fn build(sites: Vec<DVec2>) -> VoronoiDiagram {
    let config = DiagramConfigBuilder::new().seed(0).build().unwrap();
    VoronoiDiagram::generate(sites, &config).expect("random sites should build")
}

/// Clockwise hull by brute force: each hull edge has every other site strictly on its left
fn gift_wrap(sites: &[DVec2]) -> Vec<usize> {
    let start = (0..sites.len())
        .min_by(|&a, &b| sites[a].x.total_cmp(&sites[b].x))
        .unwrap();
    let mut hull = vec![start];
    let mut current = start;

    loop {
        let next = (0..sites.len())
            .find(|&candidate| {
                candidate != current
                    && (0..sites.len())
                        .filter(|&other| other != current && other != candidate)
                        .all(|other| orientation(sites[current], sites[candidate], sites[other]) > 0.0)
            })
            .expect("every hull vertex has a successor");
        if next == start {
            return hull;
        }
        hull.push(next);
        current = next;
        assert!(hull.len() <= sites.len(), "gift wrap did not close");
    }
}

/// Rotate a cyclic sequence so it starts at its smallest element
fn canonical_cycle(cycle: &[usize]) -> Vec<usize> {
    let Some(start) = (0..cycle.len()).min_by_key(|&i| cycle[i]) else {
        return Vec::new();
    };
    cycle[start..].iter().chain(&cycle[..start]).copied().collect()
}

fn sorted_neighbors(diagram: &VoronoiDiagram, index: usize) -> Vec<usize> {
    let mut neighbors = diagram.neighbors(index);
    neighbors.sort();
    neighbors
}

#[test]
fn test_face_count_matches_site_count() {
    for &size in &SIZES {
        for &seed in &SEEDS {
            let diagram = build(random_sites(size, 1000.0, 800.0, seed));
            assert_eq!(diagram.face_count(), size);
            for face in diagram.faces() {
                assert!(face.edge_count() >= 1, "face {} has no edges", face.index());
            }
        }
    }
}

#[test]
fn test_neighbors_are_mutual() {
    for &size in &SIZES {
        for &seed in &SEEDS {
            let diagram = build(random_sites(size, 1000.0, 800.0, seed));

            for face in diagram.faces() {
                for edge in face.edges() {
                    let mirror = edge.neighbor_edge();
                    assert!(mirror.is_valid());
                    assert_eq!(mirror.neighbor_edge(), edge);
                    assert_ne!(mirror.face(), Some(face.index()));

                    let line = edge.line().unwrap();
                    assert_eq!(mirror.line().unwrap().direction(), -line.direction());
                }

                for neighbor in face.neighbors() {
                    assert!(diagram.neighbors(neighbor).contains(&face.index()));
                }
            }
        }
    }
}

#[test]
fn test_boundaries_have_at_most_one_gap() {
    for &seed in &SEEDS {
        let diagram = build(random_sites(150, 600.0, 600.0, seed));

        for face in diagram.faces() {
            let gaps = face.edges().filter(|edge| !edge.next_intersects()).count();
            let on_hull = diagram.hull().contains(&face.index());
            assert_eq!(gaps, usize::from(on_hull), "face {}", face.index());

            for edge in face.edges() {
                assert_eq!(edge.next_edge().prev_edge(), edge);
                assert_eq!(edge.next_intersects(), edge.next_edge().prev_intersects());
            }
        }
    }
}

#[test]
fn test_sites_lie_left_of_their_edges() {
    for &size in &SIZES {
        let diagram = build(random_sites(size, 1000.0, 800.0, 7));

        for face in diagram.faces() {
            for edge in face.edges() {
                assert!(
                    edge.line().unwrap().to_the_left(face.site()),
                    "site {} is not inside its own edge",
                    face.index()
                );
            }
        }
    }
}

#[test]
fn test_vertices_are_empty_circle_centers() {
    for &seed in &SEEDS {
        let sites = random_sites(200, 1000.0, 1000.0, seed);
        let diagram = build(sites.clone());

        for face in diagram.faces() {
            for vertex in face.vertices() {
                let own = vertex.distance(face.site());
                let tolerance = 1e-6 * own.max(1.0);

                let closest = sites
                    .iter()
                    .map(|site| vertex.distance(*site))
                    .fold(f64::INFINITY, f64::min);
                assert!(own - closest <= tolerance, "a site is closer than the owner");

                let equidistant = sites
                    .iter()
                    .filter(|site| (vertex.distance(**site) - own).abs() <= tolerance)
                    .count();
                assert!(equidistant >= 3, "vertex meets {} sites", equidistant);
            }
        }
    }
}

#[test]
fn test_hull_matches_gift_wrap() {
    for &size in &SIZES {
        for &seed in &SEEDS {
            let sites = random_sites(size, 1000.0, 800.0, seed);
            let diagram = build(sites.clone());

            assert_eq!(
                canonical_cycle(diagram.hull()),
                canonical_cycle(&gift_wrap(&sites)),
                "size {} seed {}",
                size,
                seed
            );
        }
    }
}

#[test]
fn test_input_order_does_not_matter() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for &size in &SIZES {
        let sites = random_sites(size, 1000.0, 800.0, 5);
        let reference = build(sites.clone());

        let mut permutation: Vec<usize> = (0..size).collect();
        permutation.shuffle(&mut rng);
        let shuffled: Vec<DVec2> = permutation.iter().map(|&i| sites[i]).collect();
        let diagram = build(shuffled);

        for (position, &original) in permutation.iter().enumerate() {
            let mut neighbors: Vec<usize> = diagram
                .neighbors(position)
                .into_iter()
                .map(|neighbor| permutation[neighbor])
                .collect();
            neighbors.sort();
            assert_eq!(neighbors, sorted_neighbors(&reference, original));
        }

        let hull: Vec<usize> = diagram.hull().iter().map(|&i| permutation[i]).collect();
        assert_eq!(canonical_cycle(&hull), canonical_cycle(reference.hull()));
    }
}

#[test]
fn test_presorted_input_matches_sorted() {
    let mut sites = random_sites(128, 500.0, 500.0, 11);
    sites.sort_by(|a, b| a.x.total_cmp(&b.x));

    let config = DiagramConfigBuilder::new().presorted(true).build().unwrap();
    let presorted = VoronoiDiagram::generate(sites.clone(), &config).unwrap();
    let sorted = build(sites);

    assert_eq!(presorted.hull(), sorted.hull());
    for index in 0..presorted.face_count() {
        assert_eq!(
            sorted_neighbors(&presorted, index),
            sorted_neighbors(&sorted, index)
        );
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_build_matches_sequential() {
    let sites = random_sites(2000, 1000.0, 1000.0, 3);
    let sequential = build(sites.clone());

    let config = DiagramConfigBuilder::new()
        .parallel_threshold(3)
        .unwrap()
        .build()
        .unwrap();
    let parallel = VoronoiDiagram::generate(sites, &config).unwrap();

    assert_eq!(parallel.hull(), sequential.hull());
    for index in 0..parallel.face_count() {
        assert_eq!(
            sorted_neighbors(&parallel, index),
            sorted_neighbors(&sequential, index)
        );
    }
}

#[test]
fn test_zero_and_one_site() {
    let empty = VoronoiDiagram::build(vec![], false).unwrap();
    assert_eq!(empty.face_count(), 0);
    assert!(empty.hull_points().is_empty());

    let site = DVec2::new(3.0, 7.0);
    let single = VoronoiDiagram::build(vec![site], false).unwrap();
    assert_eq!(single.face_count(), 1);
    assert_eq!(single.face(0).unwrap().edge_count(), 0);
    assert_eq!(single.hull_points(), vec![site]);
}

#[test]
fn test_two_sites() {
    let diagram =
        VoronoiDiagram::build(vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)], false).unwrap();

    assert_eq!(diagram.face_count(), 2);
    for index in 0..2 {
        let face = diagram.face(index).unwrap();
        assert_eq!(face.edge_count(), 1);
        assert_eq!(face.neighbors(), vec![1 - index]);

        let line = face.first_edge().line().unwrap();
        assert!(line.side(DVec2::new(5.0, 0.0)).abs() < 1e-12);
        assert!(line.direction().x.abs() < 1e-12);
    }
    assert_eq!(canonical_cycle(diagram.hull()), vec![0, 1]);
}

#[test]
fn test_three_sites() {
    let sites = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(10.0, 0.0),
        DVec2::new(5.0, 10.0),
    ];
    let diagram = VoronoiDiagram::build(sites, false).unwrap();

    for face in diagram.faces() {
        assert_eq!(face.edge_count(), 2);
        assert!(!face.is_bounded());
        assert_eq!(face.neighbors().len(), 2);
    }
    // Clockwise on screen: left corner, right corner, then the lower apex.
    assert_eq!(canonical_cycle(diagram.hull()), vec![0, 1, 2]);
}

#[test]
fn test_square() {
    let sites = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(10.0, 0.0),
        DVec2::new(10.0, 10.0),
        DVec2::new(0.0, 10.0),
    ];
    let diagram = VoronoiDiagram::build(sites, false).unwrap();

    assert_eq!(diagram.face_count(), 4);
    assert_eq!(canonical_cycle(diagram.hull()), vec![0, 1, 2, 3]);

    let center = DVec2::new(5.0, 5.0);
    for face in diagram.faces() {
        assert_eq!(face.edge_count(), 2);
        for edge in face.edges() {
            assert!(edge.line().unwrap().side(center).abs() < 1e-9);
        }
    }
}
