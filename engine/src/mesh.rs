use glam::Vec3;

/// Unwelded triangle mesh: every triangle owns three consecutive vertex slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Drops all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.normals.clear();
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    pub fn positions_array(&self) -> Vec<[f32; 3]> {
        self.positions.iter().map(|v| v.to_array()).collect()
    }

    pub fn normals_array(&self) -> Vec<[f32; 3]> {
        self.normals.iter().map(|v| v.to_array()).collect()
    }

    /// Recomputes `normals` by accumulating each face normal into its three
    /// vertices and normalising. Degenerate faces leave a zero normal.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (self.positions[b] - self.positions[a]).cross(self.positions[c] - self.positions[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }
}

#[derive(Debug, Default)]
pub struct MeshBuilder {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuses the buffers of `mesh`, discarding its contents.
    pub fn from_mesh(mut mesh: Mesh) -> Self {
        mesh.clear();
        Self { positions: mesh.positions, indices: mesh.indices }
    }

    pub fn push_triangle(&mut self, corners: [Vec3; 3]) {
        let base_index = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base_index, base_index + 1, base_index + 2]);
    }

    /// Appends `other` after the current contents, rebasing its indices.
    pub fn append(&mut self, other: MeshBuilder) {
        let base_index = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.indices.extend(other.indices.into_iter().map(|i| i + base_index));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn build(self) -> Mesh {
        let mut mesh = Mesh { positions: self.positions, indices: self.indices, normals: Vec::new() };
        mesh.recompute_normals();
        mesh
    }
}
