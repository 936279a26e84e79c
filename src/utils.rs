use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

// --- Display Mesh Construction ---

/// Vertex of a display mesh: position plus texture coordinates. `tex[0]`
/// runs along the ring, `tex[1]` across the strip width.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex: [f32; 2],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Ribbon mesh for the half-twisted strip: `steps` quads around a ring of
/// `radius`, each `thickness` wide, with the cross-section direction
/// completing half a turn per full revolution. Two triangles per segment.
pub fn mobius_strip_vertices(steps: usize, radius: f32, thickness: f32) -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(steps * 6);
    for i in 0..steps {
        let (e0, c0) = segment_frame(i, steps, radius, thickness);
        let (e1, c1) = segment_frame(i + 1, steps, radius, thickness);

        let v0 = i as f32 / steps as f32;
        let v1 = (i + 1) as f32 / steps as f32;

        // Edge points: center +/- the twisted cross-section offset. The
        // ring coordinate is texture x (the field's long axis), the strip
        // width is texture y.
        let p0 = (c0 + e0, [v0, 1.0]);
        let p1 = (c0 - e0, [v0, 0.0]);
        let p2 = (c1 + e1, [v1, 1.0]);
        let p3 = (c1 - e1, [v1, 0.0]);

        for (pos, tex) in [p0, p2, p1, p2, p3, p1] {
            vertices.push(MeshVertex {
                position: pos.to_array(),
                tex,
            });
        }
    }
    vertices
}

/// Cross-section offset and ring center at segment `i`. The offset angle
/// `b` advances at half the ring angle's rate, which is what produces the
/// half-twist identification of the strip edges.
fn segment_frame(i: usize, steps: usize, radius: f32, thickness: f32) -> (Vec3, Vec3) {
    let a = i as f32 * TAU / steps as f32;
    let b = i as f32 * PI / steps as f32;
    let edge = Vec3::new(
        -a.cos() * b.sin(),
        a.sin() * b.sin(),
        -b.cos(),
    ) * (thickness / 2.0);
    let center = Vec3::new(a.cos() * radius, -a.sin() * radius, 0.0);
    (edge, center)
}

/// Fullscreen quad for the flat board view, texture coordinates covering
/// the whole field.
pub fn flat_quad_vertices() -> Vec<MeshVertex> {
    [
        ([-1.0, 1.0], [0.0, 0.0]),
        ([-1.0, -1.0], [0.0, 1.0]),
        ([1.0, 1.0], [1.0, 0.0]),
        ([1.0, 1.0], [1.0, 0.0]),
        ([-1.0, -1.0], [0.0, 1.0]),
        ([1.0, -1.0], [1.0, 1.0]),
    ]
    .into_iter()
    .map(|(p, tex): ([f32; 2], [f32; 2])| MeshVertex {
        position: [p[0], p[1], 0.0],
        tex,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_edges_meet_with_a_half_twist() {
        // After a full revolution the cross-section offset has rotated half
        // a turn: segment `steps` lines up with segment 0 negated.
        let steps = 300;
        let (e_first, c_first) = segment_frame(0, steps, 0.6, 0.8);
        let (e_last, c_last) = segment_frame(steps, steps, 0.6, 0.8);
        assert!((e_last + e_first).length() < 1e-4);
        assert!((c_last - c_first).length() < 1e-4);
    }

    #[test]
    fn strip_has_two_triangles_per_segment() {
        let vertices = mobius_strip_vertices(10, 0.6, 0.8);
        assert_eq!(vertices.len(), 60);
        // Ring coordinate spans [0, 1]. The last emitted vertex closes the
        // triangle back on the segment start, so check the span over the
        // whole mesh rather than the final element.
        assert_eq!(vertices[0].tex[0], 0.0);
        let max_ring = vertices
            .iter()
            .map(|v| v.tex[0])
            .fold(0.0f32, f32::max);
        assert_eq!(max_ring, 1.0);
    }
}
