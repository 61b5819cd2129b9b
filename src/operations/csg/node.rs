use super::plane::{Plane, Split};
use super::polygon::CsgPolygon;

/// A BSP tree node: a splitting plane, the polygons lying on it, and the
/// subtrees in front of and behind it.
#[derive(Debug, Clone, Default)]
pub struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<CsgPolygon>,
}

impl Node {
    #[must_use]
    pub fn new(polygons: &[CsgPolygon]) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Swaps solid and empty space.
    pub fn invert(&mut self) {
        for p in &mut self.polygons {
            p.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes the parts of `polygons` that are inside this tree.
    #[must_use]
    pub fn clip_polygons(&self, polygons: &[CsgPolygon]) -> Vec<CsgPolygon> {
        let Some(plane) = &self.plane else {
            return polygons.to_vec();
        };

        let mut split = Split::default();
        for p in polygons {
            plane.split_polygon(p, &mut split);
        }
        let Split {
            coplanar_front,
            coplanar_back,
            mut front,
            mut back,
        } = split;
        front.extend(coplanar_front);
        back.extend(coplanar_back);

        let mut front = match &self.front {
            Some(node) => node.clip_polygons(&front),
            None => front,
        };
        back = match &self.back {
            Some(node) => node.clip_polygons(&back),
            None => Vec::new(),
        };
        front.extend(back);
        front
    }

    /// Removes the parts of this tree's polygons that are inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        self.polygons = other.clip_polygons(&self.polygons);
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    #[must_use]
    pub fn all_polygons(&self) -> Vec<CsgPolygon> {
        let mut out = self.polygons.clone();
        if let Some(front) = &self.front {
            out.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            out.extend(back.all_polygons());
        }
        out
    }

    /// Inserts polygons into the tree, splitting them as needed.
    pub fn build(&mut self, polygons: &[CsgPolygon]) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = *self.plane.get_or_insert(first.plane);

        let mut split = Split::default();
        for p in polygons {
            plane.split_polygon(p, &mut split);
        }
        self.polygons.append(&mut split.coplanar_front);
        self.polygons.append(&mut split.coplanar_back);

        if !split.front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build(&split.front);
        }
        if !split.back.is_empty() {
            self.back.get_or_insert_with(Box::default).build(&split.back);
        }
    }
}
