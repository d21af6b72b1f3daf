//! Height field to triangle mesh conversion
//!
//! Vertices are laid out row-major (`x + z * (width + 1)`), two triangles per
//! cell, wound so that a flat grid faces +Y.

use super::color_map::ColorMapper;
use super::error::ConfigError;
use super::height_field::{HeightField, SampledHeights};
use super::params::GenerationParameters;

/// Summary of a single build
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuildStats {
    pub min_height: f32,
    pub max_height: f32,
    pub numeric_faults: usize,
}

/// Buffers handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub grid_width: u32,
    pub grid_depth: u32,
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 3]>,
    pub stats: BuildStats,
}

impl MeshData {
    /// Row-major vertex index of grid node `(x, z)`
    pub fn index_of(&self, x: u32, z: u32) -> usize {
        x as usize + z as usize * (self.grid_width as usize + 1)
    }

    /// Elevation of grid node `(x, z)`, if the node exists in this mesh
    pub fn height_at(&self, x: u32, z: u32) -> Option<f32> {
        if x > self.grid_width || z > self.grid_depth {
            return None;
        }
        self.vertices.get(self.index_of(x, z)).map(|v| v[1])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flattened index buffer, three entries per triangle
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

/// Builds a [`MeshData`] from validated parameters
pub struct MeshBuilder<'a> {
    params: &'a GenerationParameters,
    field: HeightField,
    mapper: ColorMapper,
}

impl<'a> MeshBuilder<'a> {
    /// Validate `params` and prepare the noise stack and color ramp.
    ///
    /// Nothing grid-sized is allocated if this fails.
    pub fn new(params: &'a GenerationParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let field = HeightField::from_params(params)?;
        Self::with_height_field(params, field)
    }

    /// Use a custom height field instead of the configured noise layers.
    /// `height_scale` and `noise_layers` of `params` are then ignored.
    pub fn with_height_field(
        params: &'a GenerationParameters,
        field: HeightField,
    ) -> Result<Self, ConfigError> {
        if params.grid_width == 0 || params.grid_depth == 0 {
            return Err(ConfigError::InvalidGridSize {
                width: params.grid_width,
                depth: params.grid_depth,
            });
        }
        if field.source_count() == 0 {
            return Err(ConfigError::NoNoiseLayers);
        }
        let mapper = ColorMapper::new(&params.color_ramp)?;

        Ok(Self {
            params,
            field,
            mapper,
        })
    }

    /// Run both passes and recompute normals.
    ///
    /// `previous` supplies the heights kept for nodes that sample to NaN or overflow.
    pub fn build(&self, previous: Option<&MeshData>) -> MeshData {
        let width = self.params.grid_width;
        let depth = self.params.grid_depth;

        let SampledHeights {
            heights,
            min_height,
            max_height,
            numeric_faults,
        } = self.field.sample_grid(width, depth, previous);

        let mut vertices = Vec::with_capacity(heights.len());
        for z in 0..=depth {
            for x in 0..=width {
                let height = heights[vertices.len()];
                vertices.push([x as f32, height, z as f32]);
            }
        }

        let triangles = build_triangles(width, depth);

        // 第二遍：颜色和 UV
        let range = max_height - min_height;
        let mut colors = Vec::with_capacity(vertices.len());
        let mut uvs = Vec::with_capacity(vertices.len());
        for z in 0..=depth {
            for x in 0..=width {
                let height = vertices[colors.len()][1];
                let t = if range > 0.0 {
                    ((height - min_height) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                colors.push(self.mapper.evaluate(t));
                uvs.push([x as f32 / width as f32, z as f32 / depth as f32]);
            }
        }

        let normals = compute_normals(&vertices, &triangles);

        log::info!(
            "MeshBuilder: Generated {} triangles from {}x{} grid, height range [{}, {}]",
            triangles.len(),
            width,
            depth,
            min_height,
            max_height
        );

        MeshData {
            grid_width: width,
            grid_depth: depth,
            vertices,
            triangles,
            uvs,
            colors,
            normals,
            stats: BuildStats {
                min_height,
                max_height,
                numeric_faults,
            },
        }
    }
}

/// Validate, sample and build in one go
pub fn build_mesh(
    params: &GenerationParameters,
    previous: Option<&MeshData>,
) -> Result<MeshData, ConfigError> {
    Ok(MeshBuilder::new(params)?.build(previous))
}

/// Two triangles per cell, split along the (x+1, z) - (x, z+1) diagonal
fn build_triangles(width: u32, depth: u32) -> Vec<[u32; 3]> {
    let row = width + 1;
    let mut triangles = Vec::with_capacity(width as usize * depth as usize * 2);

    for z in 0..depth {
        for x in 0..width {
            let vert = x + z * row;
            triangles.push([vert, vert + row, vert + 1]);
            triangles.push([vert + 1, vert + row, vert + row + 1]);
        }
    }

    triangles
}

/// Smooth normals: area-weighted face normals summed per vertex
fn compute_normals(vertices: &[[f32; 3]], triangles: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; vertices.len()];

    for &[i0, i1, i2] in triangles {
        let a = vertices[i0 as usize];
        let b = vertices[i1 as usize];
        let c = vertices[i2 as usize];
        let face = cross(sub(b, a), sub(c, a));
        for i in [i0, i1, i2] {
            let n = &mut normals[i as usize];
            n[0] += face[0];
            n[1] += face[1];
            n[2] += face[2];
        }
    }

    for n in &mut normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        *n = if len > f32::EPSILON && len.is_finite() {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 1.0, 0.0]
        };
    }

    normals
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
