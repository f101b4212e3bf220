use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use super::describe;
use crate::backend::{GraphicsBackend, SurfaceSize};
use crate::error::{BackgroundError, BackgroundResult, ShaderStage};

struct Attached {
    canvas: HtmlCanvasElement,
    gl: GL,
    vao: Option<WebGlVertexArrayObject>,
}

/// WebGL2 backend drawing into a canvas it inserts under a mount element.
pub struct WebGlBackend {
    document: Document,
    mount_id: String,
    attached: Option<Attached>,
}

impl WebGlBackend {
    pub fn new(document: Document, mount_id: &str) -> Self {
        Self {
            document,
            mount_id: mount_id.to_string(),
            attached: None,
        }
    }

    fn gl(&self) -> Option<&GL> {
        self.attached.as_ref().map(|a| &a.gl)
    }

    fn create_canvas(&self) -> BackgroundResult<HtmlCanvasElement> {
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(|e| BackgroundError::surface_init(describe(&e)))?
            .dyn_into()
            .map_err(|_| BackgroundError::surface_init("created element is not a canvas"))?;
        let style = canvas.style();
        for (property, value) in [
            ("position", "absolute"),
            ("inset", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("display", "block"),
            ("pointer-events", "none"),
        ] {
            style
                .set_property(property, value)
                .map_err(|e| BackgroundError::surface_init(describe(&e)))?;
        }
        Ok(canvas)
    }
}

fn context(canvas: &HtmlCanvasElement) -> BackgroundResult<GL> {
    canvas
        .get_context("webgl2")
        .map_err(|e| BackgroundError::surface_init(describe(&e)))?
        .ok_or_else(|| BackgroundError::surface_init("WebGL2 not supported"))?
        .dyn_into()
        .map_err(|_| BackgroundError::surface_init("context is not WebGL2"))
}

impl GraphicsBackend for WebGlBackend {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Location = WebGlUniformLocation;

    fn attach_surface(&mut self, size: SurfaceSize) -> BackgroundResult<()> {
        let mount = self
            .document
            .get_element_by_id(&self.mount_id)
            .ok_or_else(|| {
                BackgroundError::surface_init(format!("mount point #{} not found", self.mount_id))
            })?;
        let canvas = self.create_canvas()?;
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        mount
            .append_child(&canvas)
            .map_err(|e| BackgroundError::surface_init(describe(&e)))?;

        let gl = match context(&canvas) {
            Ok(gl) => gl,
            Err(err) => {
                canvas.remove();
                return Err(err);
            }
        };
        // The fullscreen triangle is generated from gl_VertexID; WebGL2 still
        // wants a vertex array bound for the draw.
        let vao = gl.create_vertex_array();
        gl.bind_vertex_array(vao.as_ref());
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        self.attached = Some(Attached { canvas, gl, vao });
        Ok(())
    }

    fn set_surface_size(&mut self, size: SurfaceSize) {
        if let Some(a) = &self.attached {
            a.canvas.set_width(size.width);
            a.canvas.set_height(size.height);
            a.gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    fn detach_surface(&mut self) {
        let Some(a) = self.attached.take() else {
            return;
        };
        a.gl.bind_vertex_array(None);
        a.gl.delete_vertex_array(a.vao.as_ref());
        if let Ok(Some(ext)) = a.gl.get_extension("WEBGL_lose_context") {
            ext.unchecked_into::<WebglLoseContext>().lose_context();
        }
        a.canvas.remove();
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> BackgroundResult<WebGlShader> {
        let gl = self
            .gl()
            .ok_or_else(|| BackgroundError::compile(stage, "no context"))?;
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = gl
            .create_shader(kind)
            .ok_or_else(|| BackgroundError::compile(stage, "unable to create shader object"))?;
        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        let ok = gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(BackgroundError::compile(stage, log))
        }
    }

    fn link_program(
        &mut self,
        vertex: &WebGlShader,
        fragment: &WebGlShader,
    ) -> BackgroundResult<WebGlProgram> {
        let gl = self.gl().ok_or_else(|| BackgroundError::link("no context"))?;
        let program = gl
            .create_program()
            .ok_or_else(|| BackgroundError::link("unable to create program object"))?;
        gl.attach_shader(&program, vertex);
        gl.attach_shader(&program, fragment);
        gl.link_program(&program);

        let ok = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            gl.detach_shader(&program, vertex);
            gl.detach_shader(&program, fragment);
            Ok(program)
        } else {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(BackgroundError::link(log))
        }
    }

    fn delete_shader(&mut self, shader: WebGlShader) {
        if let Some(gl) = self.gl() {
            gl.delete_shader(Some(&shader));
        }
    }

    fn delete_program(&mut self, program: WebGlProgram) {
        if let Some(gl) = self.gl() {
            gl.use_program(None);
            gl.delete_program(Some(&program));
        }
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl()?.get_uniform_location(program, name)
    }

    fn use_program(&mut self, program: &WebGlProgram) {
        if let Some(gl) = self.gl() {
            gl.use_program(Some(program));
        }
    }

    fn uniform1f(&mut self, location: &WebGlUniformLocation, value: f32) {
        if let Some(gl) = self.gl() {
            gl.uniform1f(Some(location), value);
        }
    }

    fn uniform2f(&mut self, location: &WebGlUniformLocation, x: f32, y: f32) {
        if let Some(gl) = self.gl() {
            gl.uniform2f(Some(location), x, y);
        }
    }

    fn uniform3f(&mut self, location: &WebGlUniformLocation, x: f32, y: f32, z: f32) {
        if let Some(gl) = self.gl() {
            gl.uniform3f(Some(location), x, y, z);
        }
    }

    fn uniform1i(&mut self, location: &WebGlUniformLocation, value: i32) {
        if let Some(gl) = self.gl() {
            gl.uniform1i(Some(location), value);
        }
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        if let Some(gl) = self.gl() {
            gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
            gl.clear(GL::COLOR_BUFFER_BIT);
        }
    }

    fn draw_fullscreen(&mut self) {
        if let Some(gl) = self.gl() {
            gl.draw_arrays(GL::TRIANGLES, 0, 3);
        }
    }
}

impl Drop for WebGlBackend {
    fn drop(&mut self) {
        self.detach_surface();
    }
}
