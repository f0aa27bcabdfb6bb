use glam::Vec3;

/// A tile of the dual pentagon/hexagon tiling, prior to simulation.
///
/// `vertices[i]` and `vertices[i + 1]` span the edge shared with tile
/// `neighbors[i]`; both arrays always have the same length (5 or 6).
#[derive(Debug, Clone)]
pub struct GenTile {
    pub center: Vec3,
    pub vertices: Vec<Vec3>,
    pub neighbors: Vec<u32>,
}

impl GenTile {
    pub fn is_pentagon(&self) -> bool {
        self.vertices.len() == 5
    }
}

/// Exact tile count for a geodesic tiling of the given size:
/// 12 pentagons plus `10(size+1)^2 - 10` hexagons.
pub fn geodesic_tile_count(size: u32) -> u32 {
    let f = size + 1;
    10 * f * f + 2
}

/// Construction-only vertex of the subdivided icosahedron.
///
/// Adjacency is by arena index; `paths` records subdivided edge chains so a
/// face sharing an edge reuses the chain instead of re-splitting it. Each
/// recorded path ends with the far corner vertex.
struct Vertex {
    pos: Vec3,
    adjacent: Vec<u32>,
    paths: Vec<Vec<u32>>,
}

impl Vertex {
    fn new(pos: Vec3) -> Self {
        Vertex {
            pos,
            adjacent: Vec::new(),
            paths: Vec::new(),
        }
    }
}

const ICOSAHEDRON_EDGES: [(u32, u32); 30] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 8),
    (0, 10),
    (1, 2),
    (1, 3),
    (1, 9),
    (1, 11),
    (2, 6),
    (2, 8),
    (2, 9),
    (3, 7),
    (3, 10),
    (3, 11),
    (4, 5),
    (4, 6),
    (4, 7),
    (4, 8),
    (4, 10),
    (5, 6),
    (5, 7),
    (5, 9),
    (5, 11),
    (6, 8),
    (6, 9),
    (7, 10),
    (7, 11),
    (8, 10),
    (9, 11),
];

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 1, 2],
    [0, 1, 3],
    [0, 2, 8],
    [0, 3, 10],
    [0, 8, 10],
    [6, 2, 8],
    [6, 4, 8],
    [6, 4, 5],
    [6, 5, 9],
    [6, 2, 9],
    [1, 2, 9],
    [4, 8, 10],
    [3, 7, 10],
    [4, 7, 10],
    [4, 5, 7],
    [1, 9, 11],
    [1, 3, 11],
    [3, 7, 11],
    [5, 7, 11],
    [5, 9, 11],
];

/// The 12 vertices of a regular icosahedron, golden-ratio coordinates.
fn icosahedron_vertices() -> Vec<Vertex> {
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    [
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, 1.0),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
    ]
    .into_iter()
    .map(Vertex::new)
    .collect()
}

fn connect(verts: &mut [Vertex], a: u32, b: u32) {
    verts[a as usize].adjacent.push(b);
    verts[b as usize].adjacent.push(a);
}

fn disconnect(verts: &mut [Vertex], a: u32, b: u32) {
    verts[a as usize].adjacent.retain(|&v| v != b);
    verts[b as usize].adjacent.retain(|&v| v != a);
}

fn push_vertex(verts: &mut Vec<Vertex>, pos: Vec3) -> u32 {
    verts.push(Vertex::new(pos));
    (verts.len() - 1) as u32
}

/// Replace the direct edge `a - b` with a chain of `size` interpolated
/// vertices, and record the chain on both endpoints for reuse.
fn split_edge(verts: &mut Vec<Vertex>, a: u32, b: u32, size: u32) {
    disconnect(verts, a, b);
    let start = verts[a as usize].pos;
    let end = verts[b as usize].pos;

    let mut last = a;
    let mut path = Vec::with_capacity(size as usize + 1);
    for i in 0..size {
        let t = (i + 1) as f32 / (size + 1) as f32;
        let new = push_vertex(verts, start.lerp(end, t));
        path.push(new);
        connect(verts, last, new);
        last = new;
    }
    connect(verts, last, b);
    path.push(b);

    let mut reversed: Vec<u32> = path[..path.len() - 1].to_vec();
    reversed.reverse();
    reversed.push(a);

    verts[a as usize].paths.push(path);
    verts[b as usize].paths.push(reversed);
}

fn edge_chain(verts: &[Vertex], from: u32, to: u32) -> Vec<u32> {
    verts[from as usize]
        .paths
        .iter()
        .find(|p| *p.last().expect("edge chains are never empty") == to)
        .cloned()
        .expect("every face edge is split before the interior fill")
}

/// Geodesically subdivide every face: split the three edges (or reuse a
/// chain recorded by a neighboring face), then fill the interior with a
/// shrinking triangular grid strung between the edge chains.
fn split_faces(verts: &mut Vec<Vertex>, size: u32) {
    let size = size as usize;
    for [v1, v2, v3] in ICOSAHEDRON_FACES {
        for (a, b) in [(v1, v2), (v1, v3), (v2, v3)] {
            if verts[a as usize].adjacent.contains(&b) {
                split_edge(verts, a, b, size as u32);
            }
        }

        let path_bottom = edge_chain(verts, v1, v3);
        let path_top = edge_chain(verts, v2, v3);
        let mut previous = edge_chain(verts, v1, v2);

        for i in 0..size {
            let bottom = path_bottom[i];
            let top = path_top[i];
            let bottom_pos = verts[bottom as usize].pos;
            let top_pos = verts[top as usize].pos;
            let mut last = bottom;
            let mut row = Vec::new();
            for j in 0..size - i - 1 {
                connect(verts, last, previous[j]);
                let t = (j + 1) as f32 / (size - i) as f32;
                let new = push_vertex(verts, bottom_pos.lerp(top_pos, t));
                connect(verts, last, new);
                connect(verts, new, previous[j]);
                row.push(new);
                last = new;
            }
            connect(verts, last, previous[size - i - 1]);
            connect(verts, last, top);
            connect(verts, top, previous[size - i - 1]);
            previous = row;
        }
    }
}

/// First vertex adjacent to both `v1` and `v2`, excluding `not`. Scans in
/// `v1`'s adjacency order so repeated walks are deterministic.
fn first_mutual_neighbor(verts: &[Vertex], v1: u32, v2: u32, not: Option<u32>) -> u32 {
    verts[v1 as usize]
        .adjacent
        .iter()
        .copied()
        .find(|&w| Some(w) != not && verts[v2 as usize].adjacent.contains(&w))
        .expect("closed triangulation always has a mutual neighbor")
}

/// Order a vertex's neighbors into a consistent ring by repeatedly taking
/// the mutual neighbor shared with the previous step.
fn neighbor_ring(verts: &[Vertex], v: u32) -> Vec<u32> {
    let n = verts[v as usize].adjacent.len();
    let mut ring = Vec::with_capacity(n);
    let mut prev = None;
    let mut current = verts[v as usize].adjacent[0];
    ring.push(current);
    for _ in 1..n {
        let next = first_mutual_neighbor(verts, v, current, prev);
        ring.push(next);
        prev = Some(current);
        current = next;
    }
    ring
}

/// Build the geodesic sphere for the given subdivision size and derive its
/// dual pentagon/hexagon tiling.
///
/// Tile index equals geodesic-vertex index, so the 12 pentagons (the
/// original icosahedron corners) always occupy indices 0-11.
///
/// # Panics
/// Panics if `size` is 0; `GenerationParams::validate` rejects that first.
pub fn build_tiling(size: u32) -> Vec<GenTile> {
    assert!(size >= 1, "Geodesic size must be at least 1");

    let mut verts = icosahedron_vertices();
    for (a, b) in ICOSAHEDRON_EDGES {
        connect(&mut verts, a, b);
    }
    split_faces(&mut verts, size);

    // Project onto the icosahedron's circumsphere: constant-length
    // normalization turns the flat subdivision into a geodesic sphere.
    let radius = verts[0].pos.length();
    for v in verts.iter_mut() {
        v.pos = v.pos.normalize() * radius;
    }

    let mut tiles = Vec::with_capacity(verts.len());
    for v in 0..verts.len() as u32 {
        let ring = neighbor_ring(&verts, v);
        let n = ring.len();
        let center = verts[v as usize].pos;

        // Ring vertex i is the centroid of the tile center and neighbor
        // vertices i and i+1; the edge (i, i+1) is therefore shared with
        // the dual tile of neighbor i+1.
        let vertices: Vec<Vec3> = (0..n)
            .map(|i| {
                (verts[ring[i] as usize].pos + verts[ring[(i + 1) % n] as usize].pos + center)
                    / 3.0
            })
            .collect();
        let neighbors: Vec<u32> = (0..n).map(|i| ring[(i + 1) % n]).collect();

        tiles.push(GenTile {
            center,
            vertices,
            neighbors,
        });
    }
    tiles
}
