//! A recording [`GraphicsDriver`] for tests.
//!
//! Compiles anything containing `void main` that does not contain `#error`, links
//! programs that have one compiled vertex and one compiled fragment shader attached,
//! and treats `uniform <type> <name>;` lines as active uniforms.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use super::{GraphicsDriver, ShaderStage, Surface, SurfaceEvent};

pub const INVALID_OPERATION: u32 = glow::INVALID_OPERATION;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    Uniform(String, Vec<f32>),
    ClearColor([f32; 4]),
    Clear,
    Viewport(i32, i32, i32, i32),
}

#[derive(Debug)]
struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Debug)]
pub struct MockLocation {
    name: String,
}

#[derive(Default)]
pub struct MockDriver {
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, MockShader>>,
    programs: RefCell<HashMap<u32, MockProgram>>,
    calls: RefCell<Vec<Call>>,
    sources: RefCell<Vec<String>>,
    create_failure: RefCell<Option<String>>,
    error: Cell<u32>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create_*` call fail with `message`.
    pub fn fail_create(&self, message: &str) {
        *self.create_failure.borrow_mut() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Every source string uploaded, in upload order.
    pub fn uploaded_sources(&self) -> Vec<String> {
        self.sources.borrow().clone()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn is_linked(&self, program: u32) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_handle(&self) -> Result<u32, String> {
        if let Some(message) = self.create_failure.borrow().clone() {
            return Err(message);
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Ok(id)
    }

    fn set_error(&self, code: u32) {
        if self.error.get() == 0 {
            self.error.set(code);
        }
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("uniform ")?;
        let name = rest.split_whitespace().last()?.trim_end_matches(';');
        Some(name.to_string())
    })
}

impl GraphicsDriver for MockDriver {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = MockLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.next_handle()?;
        self.shaders.borrow_mut().insert(
            id,
            MockShader {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record(Call::ShaderSource(shader));
        self.sources.borrow_mut().push(source.to_string());
        match self.shaders.borrow_mut().get_mut(&shader) {
            Some(s) => s.source = source.to_string(),
            None => self.set_error(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
        match self.shaders.borrow_mut().get_mut(&shader) {
            Some(s) => s.compiled = s.source.contains("void main") && !s.source.contains("#error"),
            None => self.set_error(glow::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.shaders.borrow().get(&shader) {
            Some(s) if !s.compiled => "0:1(1): error: syntax error, unexpected token".to_string(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
        if self.shaders.borrow_mut().remove(&shader).is_none() {
            self.set_error(glow::INVALID_VALUE);
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.next_handle()?;
        self.programs
            .borrow_mut()
            .insert(id, MockProgram::default());
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
        match self.programs.borrow_mut().get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => self.set_error(glow::INVALID_VALUE),
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(p) = programs.get_mut(&program) else {
            self.set_error(glow::INVALID_VALUE);
            return;
        };

        let attached: Vec<&MockShader> = p.attached.iter().filter_map(|id| shaders.get(id)).collect();
        let has = |stage: ShaderStage| attached.iter().any(|s| s.stage == stage && s.compiled);

        p.uniforms.clear();
        if !has(ShaderStage::Vertex) {
            p.linked = false;
            p.log = "error: no compiled vertex shader attached".to_string();
        } else if !has(ShaderStage::Fragment) {
            p.linked = false;
            p.log = "error: no compiled fragment shader attached".to_string();
        } else {
            p.linked = true;
            p.log = String::new();
            p.uniforms = attached
                .iter()
                .flat_map(|s| declared_uniforms(&s.source).collect::<Vec<_>>())
                .collect();
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
        if self.programs.borrow_mut().remove(&program).is_none() {
            self.set_error(glow::INVALID_VALUE);
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
        if let Some(program) = program {
            if !self.is_linked(program) {
                self.set_error(INVALID_OPERATION);
            }
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockLocation> {
        let programs = self.programs.borrow();
        let p = programs.get(&program)?;
        p.uniforms
            .iter()
            .any(|u| u == name)
            .then(|| MockLocation {
                name: name.to_string(),
            })
    }

    fn uniform_1_i32(&self, location: &MockLocation, x: i32) {
        self.record(Call::Uniform(location.name.clone(), vec![x as f32]));
    }

    fn uniform_1_f32(&self, location: &MockLocation, x: f32) {
        self.record(Call::Uniform(location.name.clone(), vec![x]));
    }

    fn uniform_2_f32(&self, location: &MockLocation, x: f32, y: f32) {
        self.record(Call::Uniform(location.name.clone(), vec![x, y]));
    }

    fn uniform_4_f32(&self, location: &MockLocation, x: f32, y: f32, z: f32, w: f32) {
        self.record(Call::Uniform(location.name.clone(), vec![x, y, z, w]));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn error(&self) -> u32 {
        self.error.replace(0)
    }
}

/// A [`Surface`] that replays one batch of events per poll, then reports a close request.
pub struct ScriptedSurface {
    batches: VecDeque<Vec<SurfaceEvent>>,
    pub swaps: u32,
}

impl ScriptedSurface {
    pub fn new(batches: Vec<Vec<SurfaceEvent>>) -> Self {
        Self {
            batches: batches.into(),
            swaps: 0,
        }
    }
}

impl Surface for ScriptedSurface {
    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn swap_buffers(&mut self) {
        self.swaps += 1;
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.batches
            .pop_front()
            .unwrap_or_else(|| vec![SurfaceEvent::CloseRequested])
    }
}
