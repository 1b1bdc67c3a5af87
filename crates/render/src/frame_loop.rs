use cubes_input::{Action, EdgeDetector, InputSource};
use cubes_tools::Diagnostics;

use crate::backend::GraphicsBackend;
use crate::frame::FrameController;
use crate::present::Presenter;

/// Outer loop: tick, poll input, present, record frame statistics.
pub struct FrameLoop<B, P, I, D> {
    controller: FrameController,
    backend: B,
    presenter: P,
    input: I,
    diagnostics: D,
    edges: EdgeDetector,
    frames: u64,
    finished: bool,
}

impl<B, P, I, D> FrameLoop<B, P, I, D>
where
    B: GraphicsBackend,
    P: Presenter<B>,
    I: InputSource,
    D: Diagnostics,
{
    /// Build the loop and run the controller's one-time backend setup.
    pub fn new(controller: FrameController, mut backend: B, presenter: P, input: I, diagnostics: D) -> Self {
        controller.initialize(&mut backend);
        Self {
            controller,
            backend,
            presenter,
            input,
            diagnostics,
            edges: EdgeDetector::new(),
            frames: 0,
            finished: false,
        }
    }

    pub fn controller(&self) -> &FrameController {
        &self.controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Run a single frame. Returns whether the loop should keep going.
    pub fn run_once(&mut self) -> bool {
        self.controller.tick(&mut self.backend, &mut self.diagnostics);
        self.poll_input();
        self.presenter.present(&mut self.backend);
        self.diagnostics.frame_presented();
        self.frames += 1;
        self.controller.is_running()
    }

    /// Run until input stops the loop or `max_frames` frames have run, then
    /// report final statistics. Returns the number of frames run by this call.
    pub fn run(&mut self, max_frames: Option<u64>) -> u64 {
        let start = self.frames;
        while self.controller.is_running() {
            if max_frames.is_some_and(|max| self.frames - start >= max) {
                break;
            }
            self.run_once();
        }
        self.finish();
        self.frames - start
    }

    /// Report final statistics once.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        tracing::debug!(frames = self.frames, "frame loop stopping");
        self.diagnostics.finish();
    }

    fn poll_input(&mut self) {
        let Some(held) = self.input.poll() else {
            return;
        };
        let pressed = self.edges.update(held);
        for action in Action::from_pressed(pressed) {
            self.controller.apply(action, &mut self.backend);
        }
    }
}
