//! Headless platform for running backgrounds without a browser.
//!
//! [`HeadlessBackend`] records every graphics call instead of drawing,
//! [`ManualScheduler`] holds frame requests until the caller pumps them and
//! [`ManualClock`] only moves when told to. All three hand out cheap shared
//! handles so a test can keep observing them after moving them into a
//! background.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::animation::FrameScheduler;
use crate::backend::{GraphicsBackend, SurfaceSize};
use crate::clock::Clock;
use crate::error::{BackgroundError, BackgroundResult, ShaderStage};

/// Last value written to a uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Int(i32),
}

/// Everything the backend has been asked to do so far.
#[derive(Clone, Debug, Default)]
pub struct Recording {
    pub attached: bool,
    pub attaches: u32,
    pub detaches: u32,
    pub size: SurfaceSize,
    pub resizes: u32,
    pub clears: u32,
    pub draws: u32,
    pub live_shaders: u32,
    pub live_programs: u32,
    pub program_in_use: bool,
    pub uniform_writes: u32,
    pub uniforms: HashMap<String, UniformValue>,
}

impl Recording {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniform(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<[f32; 3]> {
        match self.uniform(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<[f32; 2]> {
        match self.uniform(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }
}

/// Read-only view of a [`HeadlessBackend`]'s recording.
#[derive(Clone, Debug)]
pub struct Recorder {
    log: Rc<RefCell<Recording>>,
}

impl Recorder {
    pub fn recording(&self) -> Recording {
        self.log.borrow().clone()
    }
}

#[derive(Clone, Debug, Default)]
struct Faults {
    attach: Option<String>,
    compile: Option<(ShaderStage, String)>,
    link: Option<String>,
}

/// Graphics backend that records instead of rendering.
///
/// Uniforms count as active when the shader sources declare them with a
/// `uniform <type> <name>` statement, mimicking the linker dropping
/// undeclared names.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: Rc<RefCell<Recording>>,
    faults: Faults,
    next_id: u32,
    shader_sources: HashMap<u32, String>,
    programs: HashMap<u32, HashSet<String>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorder(&self) -> Recorder {
        Recorder {
            log: Rc::clone(&self.log),
        }
    }

    pub fn recording(&self) -> Recording {
        self.log.borrow().clone()
    }

    /// Make `attach_surface` fail, as when no context is available.
    pub fn fail_attach(&mut self, msg: &str) {
        self.faults.attach = Some(msg.to_string());
    }

    pub fn fail_compile(&mut self, stage: ShaderStage, log: &str) {
        self.faults.compile = Some((stage, log.to_string()));
    }

    pub fn fail_link(&mut self, log: &str) {
        self.faults.link = Some(log.to_string());
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn write_uniform(&mut self, name: &str, value: UniformValue) {
        let mut log = self.log.borrow_mut();
        log.uniform_writes += 1;
        log.uniforms.insert(name.to_string(), value);
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.split(';').filter_map(|statement| {
        let words: Vec<&str> = statement
            .split_whitespace()
            .filter(|w| !matches!(*w, "lowp" | "mediump" | "highp"))
            .collect();
        let at = words.iter().position(|w| *w == "uniform")?;
        // uniform <type> <name>
        let name = *words.get(at + 2)?;
        Some(name.split('[').next().unwrap_or(name).to_string())
    })
}

impl GraphicsBackend for HeadlessBackend {
    type Shader = u32;
    type Program = u32;
    type Location = String;

    fn attach_surface(&mut self, size: SurfaceSize) -> BackgroundResult<()> {
        if let Some(msg) = &self.faults.attach {
            return Err(BackgroundError::surface_init(msg.clone()));
        }
        let mut log = self.log.borrow_mut();
        log.attached = true;
        log.attaches += 1;
        log.size = size;
        Ok(())
    }

    fn set_surface_size(&mut self, size: SurfaceSize) {
        let mut log = self.log.borrow_mut();
        log.size = size;
        log.resizes += 1;
    }

    fn detach_surface(&mut self) {
        let mut log = self.log.borrow_mut();
        log.attached = false;
        log.detaches += 1;
        log.program_in_use = false;
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> BackgroundResult<u32> {
        if let Some((failing, msg)) = &self.faults.compile {
            if *failing == stage {
                return Err(BackgroundError::compile(stage, msg.clone()));
            }
        }
        let id = self.next_id();
        self.shader_sources.insert(id, source.to_string());
        self.log.borrow_mut().live_shaders += 1;
        Ok(id)
    }

    fn link_program(&mut self, vertex: &u32, fragment: &u32) -> BackgroundResult<u32> {
        if let Some(msg) = &self.faults.link {
            return Err(BackgroundError::link(msg.clone()));
        }
        let mut active = HashSet::new();
        for shader in [vertex, fragment] {
            if let Some(source) = self.shader_sources.get(shader) {
                active.extend(declared_uniforms(source));
            }
        }
        let id = self.next_id();
        self.programs.insert(id, active);
        self.log.borrow_mut().live_programs += 1;
        Ok(id)
    }

    fn delete_shader(&mut self, shader: u32) {
        if self.shader_sources.remove(&shader).is_some() {
            self.log.borrow_mut().live_shaders -= 1;
        }
    }

    fn delete_program(&mut self, program: u32) {
        if self.programs.remove(&program).is_some() {
            let mut log = self.log.borrow_mut();
            log.live_programs -= 1;
            log.program_in_use = false;
        }
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<String> {
        self.programs
            .get(program)
            .filter(|active| active.contains(name))
            .map(|_| name.to_string())
    }

    fn use_program(&mut self, program: &u32) {
        if self.programs.contains_key(program) {
            self.log.borrow_mut().program_in_use = true;
        }
    }

    fn uniform1f(&mut self, location: &String, value: f32) {
        self.write_uniform(location, UniformValue::Float(value));
    }

    fn uniform2f(&mut self, location: &String, x: f32, y: f32) {
        self.write_uniform(location, UniformValue::Vec2([x, y]));
    }

    fn uniform3f(&mut self, location: &String, x: f32, y: f32, z: f32) {
        self.write_uniform(location, UniformValue::Vec3([x, y, z]));
    }

    fn uniform1i(&mut self, location: &String, value: i32) {
        self.write_uniform(location, UniformValue::Int(value));
    }

    fn clear(&mut self, _rgba: [f32; 4]) {
        self.log.borrow_mut().clears += 1;
    }

    fn draw_fullscreen(&mut self) {
        self.log.borrow_mut().draws += 1;
    }
}

#[derive(Debug, Default)]
struct SchedulerLog {
    pending: bool,
    requested: u32,
    cancelled: u32,
    refuse: bool,
}

/// Frame scheduler whose frames only fire when the caller takes them.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    log: Rc<RefCell<SchedulerLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.log.borrow().pending
    }

    /// Consume the pending frame, if any. The caller then runs the frame.
    pub fn take_pending(&self) -> bool {
        std::mem::replace(&mut self.log.borrow_mut().pending, false)
    }

    pub fn requested(&self) -> u32 {
        self.log.borrow().requested
    }

    pub fn cancelled(&self) -> u32 {
        self.log.borrow().cancelled
    }

    /// Make further requests fail.
    pub fn refuse_requests(&self) {
        self.log.borrow_mut().refuse = true;
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> BackgroundResult<()> {
        let mut log = self.log.borrow_mut();
        if log.refuse {
            return Err(BackgroundError::scheduler("frame request refused"));
        }
        log.pending = true;
        log.requested += 1;
        Ok(())
    }

    fn cancel_frame(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.pending {
            log.pending = false;
            log.cancelled += 1;
        }
    }
}

/// Clock that only advances when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
