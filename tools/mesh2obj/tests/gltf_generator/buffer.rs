//! Binary buffer packing with accessor creation.

use gltf_json as json;
use json::validation::Checked::Valid;

/// Accessor indices for one primitive
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveAccessors {
    pub positions: u32,
    pub normals: Option<u32>,
    pub uvs: Option<u32>,
    pub colors: Option<u32>,
    pub indices: Option<u32>,
}

/// Builder for the single GLB binary buffer
#[derive(Default)]
pub struct BufferBuilder {
    pub data: Vec<u8>,
    pub views: Vec<json::buffer::View>,
    pub accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack one primitive's attributes
    pub fn pack_primitive(
        &mut self,
        positions: &[[f32; 3]],
        normals: Option<&[[f32; 3]]>,
        uvs: Option<&[[f32; 2]]>,
        colors: Option<&[[f32; 4]]>,
        indices: Option<&[u16]>,
    ) -> PrimitiveAccessors {
        let (min, max) = compute_bounds(positions);
        let positions = self.pack(
            bytemuck::cast_slice(positions),
            positions.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            json::buffer::Target::ArrayBuffer,
            Some((min, max)),
        );

        let normals = normals.map(|n| {
            self.pack(
                bytemuck::cast_slice(n),
                n.len(),
                json::accessor::ComponentType::F32,
                json::accessor::Type::Vec3,
                json::buffer::Target::ArrayBuffer,
                None,
            )
        });

        let uvs = uvs.map(|t| {
            self.pack(
                bytemuck::cast_slice(t),
                t.len(),
                json::accessor::ComponentType::F32,
                json::accessor::Type::Vec2,
                json::buffer::Target::ArrayBuffer,
                None,
            )
        });

        let colors = colors.map(|c| {
            self.pack(
                bytemuck::cast_slice(c),
                c.len(),
                json::accessor::ComponentType::F32,
                json::accessor::Type::Vec4,
                json::buffer::Target::ArrayBuffer,
                None,
            )
        });

        let indices = indices.map(|i| {
            self.pack(
                bytemuck::cast_slice(i),
                i.len(),
                json::accessor::ComponentType::U16,
                json::accessor::Type::Scalar,
                json::buffer::Target::ElementArrayBuffer,
                None,
            )
        });

        PrimitiveAccessors {
            positions,
            normals,
            uvs,
            colors,
            indices,
        }
    }

    fn pack(
        &mut self,
        bytes: &[u8],
        count: usize,
        component_type: json::accessor::ComponentType,
        type_: json::accessor::Type,
        target: json::buffer::Target,
        bounds: Option<(Vec<f32>, Vec<f32>)>,
    ) -> u32 {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some((offset as u64).into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(target)),
        });

        let (min, max) = match bounds {
            Some((min, max)) => (
                Some(json::Value::Array(
                    min.into_iter().map(json::Value::from).collect(),
                )),
                Some(json::Value::Array(
                    max.into_iter().map(json::Value::from).collect(),
                )),
            ),
            None => (None, None),
        };

        let accessor_idx = self.accessors.len() as u32;
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });

        // Keep every view 4-byte aligned
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }

        accessor_idx
    }
}

/// Compute bounding box for positions
fn compute_bounds(positions: &[[f32; 3]]) -> (Vec<f32>, Vec<f32>) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for pos in positions {
        for i in 0..3 {
            min[i] = min[i].min(pos[i]);
            max[i] = max[i].max(pos[i]);
        }
    }

    (min.to_vec(), max.to_vec())
}
