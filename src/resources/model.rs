//! 模型导入：把glTF默认场景的根节点展开为带材质标签的网格数据

use bevy_ecs::prelude::*;
use glam::{Mat3, Mat4, Vec3};

use crate::render::mesh::MeshVertex;

/// 节点使用的材质
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub enum MaterialKind {
    /// 采样烘焙光照贴图
    Baked,
    /// 纯色自发光（壁灯灯罩）
    SconceLight,
}

impl MaterialKind {
    /// 按节点名选择材质，精确匹配且区分大小写，未知名称回退到`Baked`
    pub fn for_node_name(name: &str) -> Self {
        match name {
            "baked" => MaterialKind::Baked,
            "sconceLightA" | "sconceLightB" => MaterialKind::SconceLight,
            _ => MaterialKind::Baked,
        }
    }
}

/// CPU端网格，顶点已变换到模型空间
#[derive(Debug, Clone, Default, PartialEq, Component)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 追加另一份网格，索引按当前顶点数偏移
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct ModelNodeName(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct MeshMaterial(pub MaterialKind);

/// 场景根节点及其整棵子树的网格
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub meshes: Vec<MeshData>,
}

impl ModelNode {
    pub fn material(&self) -> MaterialKind {
        MaterialKind::for_node_name(&self.name)
    }

    /// 合并子树内全部网格
    pub fn merged_mesh(&self) -> MeshData {
        let mut merged = MeshData::default();
        for mesh in &self.meshes {
            merged.append(mesh);
        }
        merged
    }
}

/// 读取默认场景（没有时取第一个场景）的根节点
pub fn import_model_nodes(doc: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<ModelNode> {
    let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) else {
        tracing::warn!(target: "assets", "Model has no scene");
        return Vec::new();
    };

    scene
        .nodes()
        .map(|node| {
            let mut meshes = Vec::new();
            collect_meshes(&node, Mat4::IDENTITY, buffers, &mut meshes);
            let name = node.name().unwrap_or_default().to_string();
            tracing::debug!(target: "assets", "Model node '{}' with {} meshes", name, meshes.len());
            ModelNode { name, meshes }
        })
        .collect()
}

fn collect_meshes(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) {
    let global = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(target: "assets", "Skipping non-triangle primitive in mesh {}", mesh.index());
                continue;
            }
            if let Some(data) = read_primitive(&primitive, global, buffers) {
                out.push(data);
            }
        }
    }

    for child in node.children() {
        collect_meshes(&child, global, buffers, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive.reader(|buf| buffers.get(buf.index()).map(|data| &data.0[..]));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|it| it.collect())
        .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect())
        .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|r| r.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let normal = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            MeshVertex {
                pos: transform.transform_point3(Vec3::from(*p)).to_array(),
                normal: (normal_matrix * Vec3::from(normal))
                    .normalize_or_zero()
                    .to_array(),
                uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            }
        })
        .collect();

    Some(MeshData { vertices, indices })
}

/// 每个根节点生成一个实体；生成后不再修改
pub fn spawn_model(world: &mut World, nodes: &[ModelNode]) -> Vec<Entity> {
    nodes
        .iter()
        .map(|node| {
            world
                .spawn((
                    ModelNodeName(node.name.clone()),
                    MeshMaterial(node.material()),
                    node.merged_mesh(),
                ))
                .id()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 一个三角形，由"baked"的子节点（平移x+1）和"sconceLightA"（放大2倍）共同引用
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 2] }],
        "nodes": [
            { "name": "baked", "children": [1] },
            { "name": "bakedChild", "mesh": 0, "translation": [1.0, 0.0, 0.0] },
            { "name": "sconceLightA", "mesh": 0, "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "accessors": [{
            "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }]
    }"#;

    #[test]
    fn test_material_for_node_name() {
        assert_eq!(MaterialKind::for_node_name("baked"), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node_name("sconceLightA"), MaterialKind::SconceLight);
        assert_eq!(MaterialKind::for_node_name("sconceLightB"), MaterialKind::SconceLight);
    }

    #[test]
    fn test_material_fallback_and_case_sensitivity() {
        assert_eq!(MaterialKind::for_node_name("mirror"), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node_name(""), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node_name("SconceLightA"), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node_name("sconcelighta"), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node_name("sconceLightC"), MaterialKind::Baked);
    }

    #[test]
    fn test_import_flattens_subtree_with_transforms() {
        let (doc, buffers, _images) = gltf::import_slice(TRIANGLE_GLTF.as_bytes()).expect("import");
        let nodes = import_model_nodes(&doc, &buffers);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "baked");
        assert_eq!(nodes[0].material(), MaterialKind::Baked);
        assert_eq!(nodes[0].meshes.len(), 1);
        assert_eq!(nodes[0].meshes[0].vertices[1].pos, [2.0, 0.0, 0.0]);
        assert_eq!(nodes[0].meshes[0].indices, vec![0, 1, 2]);

        assert_eq!(nodes[1].name, "sconceLightA");
        assert_eq!(nodes[1].material(), MaterialKind::SconceLight);
        assert_eq!(nodes[1].meshes[0].vertices[2].pos, [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_spawn_model_tags_entities() {
        let (doc, buffers, _images) = gltf::import_slice(TRIANGLE_GLTF.as_bytes()).expect("import");
        let nodes = import_model_nodes(&doc, &buffers);

        let mut world = World::new();
        let entities = spawn_model(&mut world, &nodes);
        assert_eq!(entities.len(), 2);

        let mut query = world.query::<(&ModelNodeName, &MeshMaterial, &MeshData)>();
        let mut tagged: Vec<_> = query
            .iter(&world)
            .map(|(name, material, mesh)| (name.0.clone(), material.0, mesh.indices.len()))
            .collect();
        tagged.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            tagged,
            vec![
                ("baked".to_string(), MaterialKind::Baked, 3),
                ("sconceLightA".to_string(), MaterialKind::SconceLight, 3),
            ]
        );
    }

    #[test]
    fn test_merge_offsets_indices() {
        let tri = MeshData {
            vertices: vec![MeshVertex::default(); 3],
            indices: vec![0, 1, 2],
        };
        let node = ModelNode {
            name: "baked".to_string(),
            meshes: vec![tri.clone(), tri],
        };
        let merged = node.merged_mesh();
        assert_eq!(merged.vertices.len(), 6);
        assert_eq!(merged.indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
