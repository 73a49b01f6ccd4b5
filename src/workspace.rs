//! Application façade tying the scene, view, smoothing and export together.

use crate::config::SketchConfig;
use crate::error::{Result, SketchError};
use crate::io::dxf::{to_dxf_string, DxfReader};
use crate::notification::{NotificationCollection, NotificationType};
use crate::parse::parse_points;
use crate::preferences::{PreferenceStore, ViewSettings};
use crate::scene::SceneStore;
use crate::stream::{SerialPort, StreamIngestor};
use crate::types::{Point, PointSequence, Vector2};
use crate::viewport::{CameraTransition, HoverInfo, SurfaceSize, ViewCommand, Viewport};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Preference key holding the scene's points.
pub const SCENE_POINTS_KEY: &str = "scene.points";

/// One drawing session.
#[derive(Debug)]
pub struct Workspace {
    config: SketchConfig,
    scene: Arc<SceneStore>,
    viewport: Viewport,
    settings: ViewSettings,
    notifications: NotificationCollection,
}

impl Workspace {
    pub fn new(config: SketchConfig) -> Self {
        Self {
            viewport: Viewport::new(SurfaceSize::default(), config.viewport),
            config,
            scene: Arc::new(SceneStore::new()),
            settings: ViewSettings::default(),
            notifications: NotificationCollection::new(),
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    /// Shared handle to the scene, usable as a stream sink.
    pub fn scene_sink(&self) -> Arc<SceneStore> {
        Arc::clone(&self.scene)
    }

    pub fn points(&self) -> Arc<PointSequence> {
        self.scene.snapshot()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ViewSettings {
        &mut self.settings
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Keep notifications produced elsewhere, such as a finished stream.
    pub fn absorb_notifications(&mut self, notifications: NotificationCollection) {
        self.notifications.extend(notifications);
    }

    /// Replace the scene with the points parsed from `text`.
    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let points = parse_points(text)?;
        Ok(self.replace_scene(points, "Imported"))
    }

    /// Append the points parsed from `text` to the scene.
    pub fn append_text(&mut self, text: &str) -> Result<usize> {
        let points = parse_points(text)?;
        let count = points.len();
        self.scene.append(&points);
        self.notifications
            .notify(NotificationType::Info, format!("Appended {} points", count));
        Ok(count)
    }

    /// Replace the scene from a file: `.dxf` files are read as DXF, anything
    /// else as point text.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let is_dxf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("dxf"));

        let points = if is_dxf {
            DxfReader::from_file(path)?.read_points()?
        } else {
            parse_points(&fs::read_to_string(path)?)?
        };
        tracing::info!(path = %path.display(), count = points.len(), "imported file");
        Ok(self.replace_scene(points, "Imported"))
    }

    pub fn clear(&mut self) {
        self.scene.clear();
        self.notifications
            .notify(NotificationType::Info, "Cleared scene");
    }

    /// Points as drawn: smoothed per the view settings, or the raw scene.
    pub fn display_points(&self) -> Vec<Point> {
        let points = self.scene.snapshot();
        if self.settings.draw_algorithm.draws_curve() {
            self.config.smoothing.apply(&points, self.settings.curve_level)
        } else {
            points.to_vec()
        }
    }

    /// Serialize the scene as DXF, optionally smoothed at `smoothing_level`.
    pub fn export_dxf(&mut self, smoothing_level: Option<u32>) -> Result<String> {
        let points = self.scene.snapshot();
        if points.is_empty() {
            self.notifications
                .notify(NotificationType::Warning, SketchError::EmptyExport.to_string());
            return Err(SketchError::EmptyExport);
        }
        let points = match smoothing_level {
            Some(level) => self.config.smoothing.apply(&points, level),
            None => points.to_vec(),
        };
        to_dxf_string(&points, &self.config.export)
    }

    /// [`export_dxf`](Self::export_dxf) written to `path`.
    pub fn export_dxf_to_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        smoothing_level: Option<u32>,
    ) -> Result<()> {
        let text = self.export_dxf(smoothing_level)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn apply_view_command(&mut self, command: ViewCommand) -> Option<CameraTransition> {
        let points = self.scene.snapshot();
        self.viewport.apply(command, &points)
    }

    pub fn hover(&self, screen: Vector2) -> HoverInfo {
        self.viewport.hover(&self.scene.snapshot(), screen)
    }

    /// Start streaming: clears the scene and returns an ingestor with `port`
    /// selected. Connect it with [`scene_sink`](Self::scene_sink).
    pub fn begin_stream<P: SerialPort>(&mut self, port: P) -> Result<StreamIngestor<P>> {
        let mut ingestor = StreamIngestor::new(self.config.stream);
        ingestor.select_port(port)?;
        self.scene.clear();
        Ok(ingestor)
    }

    /// Persist view settings and the scene points.
    pub fn save_to<S: PreferenceStore>(&self, store: &mut S) -> Result<()> {
        self.settings.save(store)?;
        store.set(SCENE_POINTS_KEY, self.scene.snapshot().as_slice())
    }

    /// Load view settings and scene points saved by [`save_to`](Self::save_to).
    pub fn restore_from<S: PreferenceStore>(&mut self, store: &S) {
        self.settings = ViewSettings::load(store);
        let points: PointSequence = store.get_or(SCENE_POINTS_KEY, Vec::new());
        self.scene.replace_all(points);
    }

    fn replace_scene(&mut self, points: PointSequence, verb: &str) -> usize {
        let count = points.len();
        self.scene.replace_all(points);
        self.notifications
            .notify(NotificationType::Info, format!("{} {} points", verb, count));
        count
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}
