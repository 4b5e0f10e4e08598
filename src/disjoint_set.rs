/// Disjoint-set forest with union by size and path compression.
///
/// Each element carries a weight (a cave's tile count) that is summed per
/// set, so the largest systems can be found without walking members.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    weight: Vec<usize>,
    sets: usize,
}

impl DisjointSet {
    pub fn new(weights: &[usize]) -> Self {
        Self {
            parent: (0..weights.len()).collect(),
            size: vec![1; weights.len()],
            weight: weights.to_vec(),
            sets: weights.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets
    pub fn set_count(&self) -> usize {
        self.sets
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Root lookup without compression, for use behind a shared borrow.
    pub fn root(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets holding `a` and `b`. Returns false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.weight[ra] += self.weight[rb];
        self.sets -= 1;
        true
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of elements in the set holding `x`
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// Summed weight of the set holding `x`
    pub fn set_weight(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.weight[root]
    }

    /// Current roots, ordered by descending weight (ties by root index)
    pub fn roots_by_weight(&self) -> Vec<usize> {
        let mut roots: Vec<usize> = (0..self.len()).filter(|&x| self.parent[x] == x).collect();
        roots.sort_by(|&a, &b| self.weight[b].cmp(&self.weight[a]).then(a.cmp(&b)));
        roots
    }
}
