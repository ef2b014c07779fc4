//! Point quadtree over web-mercator tiles.
//!
//! Each node keeps its `threshold` most populous points; anything beyond
//! spills into the child tile one level down that contains it. Shallow nodes
//! therefore hold the biggest cities, which is what a zoomed-out view wants.

use std::collections::VecDeque;

use foundation::{GeoRectangle, lon_lat_to_tile, mercator_tile_rectangle, tile_to_lon_lat};
use serde::Serialize;

pub const DEFAULT_NODE_CAPACITY: usize = 10;

/// Nodes at this level keep every point they receive, so coincident points
/// cannot split forever.
pub const MAX_DEPTH: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    /// `[lon, lat]` in degrees.
    pub position: [f64; 2],
    pub population: u64,
    pub elevation: i64,
}

impl City {
    fn lon(&self) -> f64 {
        self.position[0]
    }

    fn lat(&self) -> f64 {
        self.position[1]
    }
}

#[derive(Debug)]
pub struct Node {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub bbox: GeoRectangle,
    threshold: usize,
    points: Vec<City>,
    children: Vec<Node>,
}

impl Node {
    fn new(x: u32, y: u32, z: u32, threshold: usize) -> Self {
        Self {
            x,
            y,
            z,
            bbox: mercator_tile_rectangle(x, y, z),
            threshold,
            points: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sorted by population, most populous first.
    pub fn points(&self) -> &[City] {
        &self.points
    }

    pub fn child(&self, x: u32, y: u32) -> Option<&Node> {
        self.children.iter().find(|c| c.x == x && c.y == y)
    }

    fn insert(&mut self, city: City) {
        self.add_sorted(city);
        if self.z >= MAX_DEPTH {
            return;
        }
        while self.points.len() > self.threshold {
            let Some(smallest) = self.points.pop() else {
                break;
            };
            self.insert_child(smallest);
        }
    }

    fn insert_child(&mut self, city: City) {
        let (x, y) = lon_lat_to_tile(city.lon(), city.lat(), self.z + 1);
        let idx = match self.children.iter().position(|c| c.x == x && c.y == y) {
            Some(idx) => idx,
            None => {
                self.children
                    .push(Node::new(x, y, self.z + 1, self.threshold));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(city);
    }

    // Ties go in front of the existing points.
    fn add_sorted(&mut self, city: City) {
        let idx = self
            .points
            .iter()
            .position(|p| city.population >= p.population)
            .unwrap_or(self.points.len());
        self.points.insert(idx, city);
    }
}

#[derive(Debug)]
pub struct QuadTree {
    root: Node,
}

impl QuadTree {
    pub fn new(points_per_node: usize) -> Self {
        Self {
            root: Node::new(0, 0, 0, points_per_node.max(1)),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn insert(&mut self, city: City) {
        self.root.insert(city);
    }

    /// Visits children before their parent.
    pub fn traverse_dfs<F: FnMut(&Node)>(&self, mut visitor: F) {
        fn walk<F: FnMut(&Node)>(node: &Node, visitor: &mut F) {
            for child in &node.children {
                walk(child, visitor);
            }
            visitor(node);
        }
        walk(&self.root, &mut visitor);
    }

    /// Shallowest match first.
    pub fn find_by_name_bfs(&self, name: &str) -> Option<(&City, &Node)> {
        let mut queue: VecDeque<&Node> = VecDeque::from([&self.root]);
        while let Some(node) = queue.pop_front() {
            if let Some(city) = node.points.iter().find(|p| p.name == name) {
                return Some((city, node));
            }
            queue.extend(node.children.iter());
        }
        None
    }

    /// Breadth-first over nodes intersecting `bbox`, visiting each contained
    /// point. The visitor returns `true` to stop.
    pub fn traverse_by_box<'a, F>(&'a self, bbox: &GeoRectangle, mut visitor: F)
    where
        F: FnMut(&'a City, &'a Node) -> bool,
    {
        let mut queue: VecDeque<&Node> = VecDeque::from([&self.root]);
        while let Some(node) = queue.pop_front() {
            for city in &node.points {
                if bbox.contains(city.lon(), city.lat()) && visitor(city, node) {
                    return;
                }
            }
            queue.extend(node.children.iter().filter(|c| c.bbox.intersects(bbox)));
        }
    }

    /// Walks from the root towards the tile `(x, y, z)`, visiting every node
    /// on the path down to level `z`.
    pub fn traverse_to_tile<'a, F>(&'a self, x: u32, y: u32, z: u32, mut visitor: F)
    where
        F: FnMut(&'a Node),
    {
        let (lon1, lat1) = tile_to_lon_lat(x, y, z);
        let (lon2, lat2) = tile_to_lon_lat(x + 1, y + 1, z);
        let lon = (lon1 + lon2) / 2.0;
        let lat = (lat1 + lat2) / 2.0;

        let mut tile: Option<&'a Node> = Some(&self.root);
        while let Some(node) = tile {
            if node.z > z {
                break;
            }
            visitor(node);
            let (cx, cy) = lon_lat_to_tile(lon, lat, node.z + 1);
            tile = node.child(cx, cy);
        }
    }

    /// Points stored on the path to `(x, y, z)` that fall inside that tile.
    pub fn tile_points(&self, x: u32, y: u32, z: u32) -> Vec<&City> {
        let mut points = Vec::new();
        self.traverse_to_tile(x, y, z, |node| {
            for city in &node.points {
                if lon_lat_to_tile(city.lon(), city.lat(), z) == (x, y) {
                    points.push(city);
                }
            }
        });
        points
    }

    /// Most populous points inside `bbox`, skipping any closer than a fifth
    /// of the box width (in degrees) to one already picked.
    pub fn box_points(&self, bbox: &GeoRectangle, max_points: Option<usize>) -> Vec<&City> {
        let min_distance = bbox.width() * 0.2;
        let mut points: Vec<&City> = Vec::new();

        self.traverse_by_box(bbox, |city, _node| {
            let clustered = points
                .iter()
                .any(|p| distance_deg(city, p) < min_distance);
            if !clustered {
                points.push(city);
            }
            max_points.is_some_and(|max| points.len() >= max)
        });
        points
    }

    /// Deepest level and number of stored points.
    pub fn stats(&self) -> (u32, usize) {
        let mut max_z = 0;
        let mut count = 0;
        self.traverse_dfs(|node| {
            max_z = max_z.max(node.z);
            count += node.points.len();
        });
        (max_z, count)
    }
}

impl Default for QuadTree {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_CAPACITY)
    }
}

fn distance_deg(a: &City, b: &City) -> f64 {
    let dx = a.lon() - b.lon();
    let dy = a.lat() - b.lat();
    (dx * dx + dy * dy).sqrt()
}
