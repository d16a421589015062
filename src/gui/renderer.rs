use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform, Texture,
    TextureManager,
};
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use tracing::info;

use crate::math::sphere::SphereMesh;
use crate::model::{BodyID, DrawCall, RenderBackend};

// GPU copy of a body's mesh. Positions and texture coordinates never change;
// normals are re-uploaded whenever the CPU side moves to a new revision.
struct GpuMesh {
    positions: GPUVec<Point3<f32>>,
    tex_coords: GPUVec<Point2<f32>>,
    normals: GPUVec<Vector3<f32>>,
    revision: u64,
}

impl GpuMesh {
    fn new(mesh: &SphereMesh) -> Self {
        GpuMesh {
            positions: GPUVec::new(
                mesh.positions().to_vec(),
                BufferType::Array,
                AllocationType::StaticDraw,
            ),
            tex_coords: GPUVec::new(
                mesh.tex_coords().to_vec(),
                BufferType::Array,
                AllocationType::StaticDraw,
            ),
            normals: GPUVec::new(
                mesh.normals().to_vec(),
                BufferType::Array,
                AllocationType::StreamDraw,
            ),
            revision: mesh.revision(),
        }
    }

    fn sync(&mut self, mesh: &SphereMesh) {
        if self.revision == mesh.revision() {
            return;
        }
        // data_mut marks the buffer dirty, so the next bind re-uploads it
        if let Some(normals) = self.normals.data_mut() {
            normals.clear();
            normals.extend_from_slice(mesh.normals());
        }
        self.revision = mesh.revision();
    }
}

// Everything about a draw call that has to outlive the call itself
struct QueuedDraw {
    body: BodyID,
    texture: Rc<Texture>,
    translation: Matrix4<f32>,
    rotation: Matrix4<f32>,
    neg_rotation: Matrix4<f32>,
    emissive: bool,
}

pub struct PlanetRenderer {
    // OpenGL stuff
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    tex_coord: ShaderAttribute<Point2<f32>>,
    normal: ShaderAttribute<Vector3<f32>>,
    translation: ShaderUniform<Matrix4<f32>>,
    rotation: ShaderUniform<Matrix4<f32>>,
    neg_rotation: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    light_pos: ShaderUniform<Point3<f32>>,
    view_pos: ShaderUniform<Point3<f32>>,
    emissive: ShaderUniform<f32>,
    sampler: ShaderUniform<i32>,
    light_position: Point3<f32>,
    // Data storage
    meshes: HashMap<BodyID, GpuMesh>,
    textures: HashMap<String, Rc<Texture>>,
    queue: Vec<QueuedDraw>,
}

impl PlanetRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        PlanetRenderer {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            tex_coord: shader
                .get_attrib::<Point2<f32>>("tex_coord")
                .expect("Failed to get shader attribute."),
            normal: shader
                .get_attrib::<Vector3<f32>>("normal")
                .expect("Failed to get shader attribute."),
            translation: shader
                .get_uniform::<Matrix4<f32>>("translation")
                .expect("Failed to get shader uniform."),
            rotation: shader
                .get_uniform::<Matrix4<f32>>("rotation")
                .expect("Failed to get shader uniform."),
            neg_rotation: shader
                .get_uniform::<Matrix4<f32>>("neg_rotation")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            light_pos: shader
                .get_uniform::<Point3<f32>>("light_pos")
                .expect("Failed to get shader uniform."),
            view_pos: shader
                .get_uniform::<Point3<f32>>("view_pos")
                .expect("Failed to get shader uniform."),
            emissive: shader
                .get_uniform::<f32>("emissive")
                .expect("Failed to get shader uniform."),
            sampler: shader
                .get_uniform::<i32>("tex")
                .expect("Failed to get shader uniform."),
            shader,
            // The sun sits at the origin
            light_position: Point3::origin(),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            queue: vec![],
        }
    }

    fn texture(&mut self, path: &str) -> Rc<Texture> {
        self.textures
            .entry(path.to_owned())
            .or_insert_with(|| {
                info!(path, "Loading texture");
                TextureManager::get_global_manager(|tm| tm.add(Path::new(path), path))
            })
            .clone()
    }
}

impl RenderBackend for PlanetRenderer {
    fn draw(&mut self, call: DrawCall<'_>) {
        self.meshes
            .entry(call.body)
            .and_modify(|gpu| gpu.sync(call.mesh))
            .or_insert_with(|| GpuMesh::new(call.mesh));

        let texture = self.texture(call.texture);
        self.queue.push(QueuedDraw {
            body: call.body,
            texture,
            translation: *call.translation,
            rotation: *call.rotation,
            neg_rotation: *call.neg_rotation,
            emissive: call.emissive,
        });
    }
}

impl Renderer for PlanetRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.queue.is_empty() {
            return;
        }

        self.shader.use_program();
        self.position.enable();
        self.tex_coord.enable();
        self.normal.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.light_pos.upload(&self.light_position);
        self.view_pos.upload(&camera.eye());
        self.sampler.upload(&0);

        let ctxt = Context::get();
        // We look at the starfield from the inside
        ctxt.disable(Context::CULL_FACE);

        for draw in self.queue.iter() {
            let mesh = match self.meshes.get_mut(&draw.body) {
                Some(mesh) => mesh,
                None => continue,
            };

            self.position.bind(&mut mesh.positions);
            self.tex_coord.bind(&mut mesh.tex_coords);
            self.normal.bind(&mut mesh.normals);

            ctxt.active_texture(Context::TEXTURE0);
            ctxt.bind_texture(Context::TEXTURE_2D, Some(&*draw.texture));

            self.translation.upload(&draw.translation);
            self.rotation.upload(&draw.rotation);
            self.neg_rotation.upload(&draw.neg_rotation);
            self.emissive
                .upload(&if draw.emissive { 1.0 } else { 0.0 });

            ctxt.draw_arrays(Context::TRIANGLES, 0, mesh.positions.len() as i32);

            ctxt.bind_texture(Context::TEXTURE_2D, None);
        }

        self.position.disable();
        self.tex_coord.disable();
        self.normal.disable();
        // Culling is on by default for everything else kiss3d draws
        ctxt.enable(Context::CULL_FACE);

        self.queue.clear();
    }
}

/// Vertex shader for textured bodies.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 tex_coord;
    attribute vec3 normal;
    varying   vec2 v_tex_coord;
    varying   vec3 v_normal;
    varying   vec3 v_frag_pos;
    uniform   mat4 translation;
    uniform   mat4 rotation;
    uniform   mat4 neg_rotation;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        vec4 world = translation * rotation * vec4(position, 1.0);
        // Normals don't spin with the surface, so shading stays put
        // relative to the light.
        v_normal = (neg_rotation * rotation * vec4(normal, 0.0)).xyz;
        v_frag_pos = world.xyz;
        v_tex_coord = tex_coord;
        gl_Position = proj * view * world;
    }";

/// Fragment shader for textured bodies: ambient, diffuse and a little
/// specular from a point light, or flat texture if emissive.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec2 v_tex_coord;
    varying vec3 v_normal;
    varying vec3 v_frag_pos;
    uniform sampler2D tex;
    uniform vec3  light_pos;
    uniform vec3  view_pos;
    uniform float emissive;
    void main() {
        vec4 color = texture2D(tex, v_tex_coord);
        vec3 n = normalize(v_normal);
        vec3 l = normalize(light_pos - v_frag_pos);
        vec3 v = normalize(view_pos - v_frag_pos);
        float diffuse = max(dot(n, l), 0.0);
        float specular = 0.3 * pow(max(dot(v, reflect(-l, n)), 0.0), 16.0);
        vec3 lit = color.rgb * (0.15 + diffuse) + vec3(specular);
        gl_FragColor = vec4(mix(lit, color.rgb, emissive), color.a);
    }";
