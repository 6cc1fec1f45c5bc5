use crate::config::GameConfig;
use crate::core::Texture;
use crate::error::RenderError;
use crate::math::{Flip, Rect};
use crate::renderer::{Canvas, CopyOptions};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const PIPE_START_X: i32 = 600;
pub const PIPE_WIDTH: i32 = 50;
pub const PIPE_MIN_HEIGHT: i32 = 100;
pub const PIPE_HEIGHT_RANGE: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipe {
    pub x: i32,
    pub w: i32,
    pub h: i32,
    /// Hangs from the top instead of rising from the floor.
    pub inverted: bool,
}

impl Pipe {
    /// A pipe just past the right edge with a random height in `[100, 400)`.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            x: PIPE_START_X,
            w: PIPE_WIDTH,
            h: PIPE_MIN_HEIGHT + rng.gen_range(0..PIPE_HEIGHT_RANGE),
            inverted: rng.gen::<f32>() > 0.5,
        }
    }

    #[must_use]
    pub fn dst_rect(&self, floor: i32) -> Rect {
        let y = if self.inverted { 0 } else { floor - self.h };
        Rect::new(self.x, y, self.w, self.h)
    }

    #[must_use]
    pub fn flip(&self) -> Flip {
        if self.inverted {
            Flip::Vertical
        } else {
            Flip::None
        }
    }

    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.w <= 0
    }

    fn paint<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        texture: &Texture,
        floor: i32,
    ) -> Result<(), RenderError> {
        let options = CopyOptions {
            flip: self.flip(),
            ..CopyOptions::default()
        };
        canvas.copy_ex(texture, None, Some(self.dst_rect(floor)), options)
    }
}

/// Background thread producing one pipe per interval until stopped.
pub struct PipeSpawner {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl PipeSpawner {
    /// Spawns the first pipe right away, then one every `interval`.
    pub fn start(interval: Duration, pipes: Sender<Pipe>) -> std::io::Result<Self> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("pipe-spawner".to_string())
            .spawn(move || {
                let mut rng = ChaCha8Rng::from_entropy();
                let mut spawned = 0;

                loop {
                    if pipes.send(Pipe::random(&mut rng)).is_err() {
                        // Field is gone
                        break;
                    }
                    spawned += 1;

                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                log::debug!("Pipe spawner stopped after {spawned} pipes");
                spawned
            })?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Stops the thread and waits for it. Returns how many pipes it sent, or
    /// `None` if it was already stopped.
    pub fn stop(&mut self) -> Option<usize> {
        if let Some(shutdown) = self.shutdown.take() {
            // The thread may already have exited; disconnecting is enough then.
            let _ = shutdown.send(());
        }

        let handle = self.handle.take()?;
        match handle.join() {
            Ok(spawned) => Some(spawned),
            Err(_) => {
                log::error!("Pipe spawner thread panicked");
                None
            }
        }
    }
}

impl Drop for PipeSpawner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scrolling pipes, in spawn order.
pub struct PipeField {
    pipes: Vec<Pipe>,
    texture: Texture,
    incoming: Receiver<Pipe>,
    spawner: Option<PipeSpawner>,
    step: i32,
    floor: i32,
    evict_offscreen: bool,
    total_spawned: usize,
}

impl PipeField {
    /// Creates the field and starts its spawner thread.
    pub fn new(texture: Texture, config: &GameConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut field = Self::with_receiver(texture, config, receiver);

        match PipeSpawner::start(config.spawn_interval, sender) {
            Ok(spawner) => field.spawner = Some(spawner),
            Err(e) => log::error!("Failed to start pipe spawner: {e}"),
        }

        field
    }

    /// Creates a field without a spawner thread; pipes sent on the returned
    /// sender are picked up on the next update.
    pub fn detached(texture: Texture, config: &GameConfig) -> (Self, Sender<Pipe>) {
        let (sender, receiver) = mpsc::channel();
        (Self::with_receiver(texture, config, receiver), sender)
    }

    fn with_receiver(texture: Texture, config: &GameConfig, incoming: Receiver<Pipe>) -> Self {
        Self {
            pipes: Vec::new(),
            texture,
            incoming,
            spawner: None,
            step: config.pipe_step,
            floor: config.height as i32,
            evict_offscreen: config.evict_offscreen,
            total_spawned: 0,
        }
    }

    /// Appends every pipe spawned since the last call. Returns how many.
    pub fn collect_spawned(&mut self) -> usize {
        let mut received = 0;
        loop {
            match self.incoming.try_recv() {
                Ok(pipe) => {
                    self.pipes.push(pipe);
                    received += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if received > 0 {
            self.total_spawned += received;
            log::debug!("{received} pipe(s) spawned, {} on field", self.pipes.len());
        }
        received
    }

    /// Picks up new pipes, scrolls every pipe left by one step and drops the
    /// ones that left the screen when eviction is on.
    pub fn update(&mut self) {
        self.collect_spawned();

        for pipe in &mut self.pipes {
            pipe.x -= self.step;
        }

        if self.evict_offscreen {
            self.pipes.retain(|pipe| !pipe.is_offscreen());
        }
    }

    /// Paints pipes in spawn order, stopping at the first failure.
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), RenderError> {
        for pipe in &self.pipes {
            pipe.paint(canvas, &self.texture, self.floor)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Pipes received over the field's lifetime, evicted ones included.
    #[must_use]
    pub fn total_spawned(&self) -> usize {
        self.total_spawned
    }

    /// Stops the spawner thread. Returns how many pipes it produced.
    pub fn stop_spawning(&mut self) -> Option<usize> {
        self.spawner.as_mut().and_then(PipeSpawner::stop)
    }

    /// Stops spawning and releases the pipe texture.
    pub fn destroy(mut self) {
        self.stop_spawning();
        log::debug!(
            "Pipe field destroyed with {} pipes ({} spawned)",
            self.pipes.len(),
            self.total_spawned
        );
    }
}
