use crate::app::controllers::buffers::BufferSetManager;
use crate::app::controllers::dispatcher::{DispatchOutcome, InputDispatcher};
use crate::app::controllers::focus::FocusTracker;
use crate::app::controllers::history::HistoryManager;
use crate::app::domain::buffer::{BufferId, BufferSet};
use crate::app::domain::focus::{FocusState, SelectionRange};
use crate::app::domain::keyboard;
use crate::app::domain::messages::{ActionCommand, InputEvent};
use crate::app::domain::settings::EditorSettings;
use crate::app::domain::style::PresentationStyle;
use crate::app::infrastructure::cursor::CursorQuery;
use crate::app::services::notify::{Notifier, Severity};
use crate::app::services::store::FileStore;

/// One editing session: owns the buffers, their history, focus and the
/// dispatcher, plus the outer collaborators (caret access, file store,
/// notifications). Built once and passed around by reference.
pub struct EditorSession<C: CursorQuery> {
    buffers: BufferSetManager,
    focus: FocusTracker,
    dispatcher: InputDispatcher,
    cursor: C,
    store: FileStore,
    notifier: Box<dyn Notifier>,
    styles: Vec<PresentationStyle>,
    default_style: PresentationStyle,
    /// Name of the file last saved or opened.
    current_file: Option<String>,
}

impl<C: CursorQuery> EditorSession<C> {
    pub fn new(
        settings: &EditorSettings,
        cursor: C,
        store: FileStore,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let default_style = settings.default_style();
        Self {
            buffers: BufferSetManager::with_history_capacity(settings.history_capacity),
            focus: FocusTracker::new(),
            dispatcher: InputDispatcher::new(settings.restore_policy),
            cursor,
            store,
            notifier,
            styles: vec![default_style.clone()],
            default_style,
            current_file: None,
        }
    }

    // --- Accessors ---

    pub fn buffers(&self) -> &BufferSet {
        self.buffers.buffers()
    }

    pub fn content(&self, id: BufferId) -> Option<&str> {
        self.buffers.content(id)
    }

    pub fn history(&self) -> &HistoryManager {
        self.buffers.history()
    }

    pub fn current_focus(&self) -> FocusState {
        self.focus.current_focus()
    }

    pub fn style(&self, id: BufferId) -> Option<&PresentationStyle> {
        self.styles.get(id.0)
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    // --- Input ---

    /// Handle one keyboard event. Style results are applied to the focused
    /// buffer's presentation here; everything else is the dispatcher's job.
    pub fn handle(&mut self, event: InputEvent) -> DispatchOutcome {
        let outcome = self.dispatcher.dispatch(
            event,
            &mut self.buffers,
            &mut self.focus,
            &mut self.cursor,
        );

        match &outcome {
            DispatchOutcome::Styled(id, command) => {
                if let Some(style) = self.styles.get_mut(id.0) {
                    if !style.apply(command) {
                        tracing::warn!(
                            "Ignoring {} value {:?} for buffer {}",
                            command.property.as_str(),
                            command.value,
                            id
                        );
                    }
                }
            }
            DispatchOutcome::HistoryMoved => self.sync_styles(),
            DispatchOutcome::Edited(_) | DispatchOutcome::Ignored => {}
        }
        outcome
    }

    /// Press a key of the on-screen keyboard by its label.
    pub fn press_key(&mut self, label: &str) -> DispatchOutcome {
        match keyboard::key_event(label) {
            Some(event) => self.handle(event),
            None => {
                tracing::debug!("No key labelled {:?}", label);
                DispatchOutcome::Ignored
            }
        }
    }

    pub fn undo(&mut self) -> DispatchOutcome {
        self.handle(InputEvent::Action(ActionCommand::Undo))
    }

    pub fn redo(&mut self) -> DispatchOutcome {
        self.handle(InputEvent::Action(ActionCommand::Redo))
    }

    /// Record that the widget for `id` gained focus or changed selection.
    /// Unknown ids are ignored. Restores still waiting for another buffer
    /// are subject to the restore policy.
    pub fn focus(&mut self, id: BufferId, selection: SelectionRange) -> bool {
        let Some(buffer) = self.buffers.buffers().get(id) else {
            return false;
        };
        let selection = selection.clamp_to(buffer.char_len());
        self.focus.focus(id, selection);
        self.dispatcher.on_focus_changed(id);
        true
    }

    /// Called by the host once it has re-rendered; runs queued caret
    /// restores.
    pub fn after_render(&mut self) -> usize {
        self.dispatcher.run_deferred(&mut self.focus, &mut self.cursor)
    }

    // --- Buffer operations ---

    pub fn add_buffer(&mut self) -> BufferId {
        self.after_render();
        let id = self.buffers.add_buffer();
        self.sync_styles();
        id
    }

    pub fn remove_buffer(&mut self, id: BufferId) -> bool {
        self.after_render();
        if !self.buffers.remove_buffer(id, &mut self.focus) {
            return false;
        }
        self.styles.remove(id.0);
        self.sync_styles();
        true
    }

    // --- File operations ---

    pub fn save(&mut self, name: &str) -> bool {
        match self.store.save(name, self.buffers.buffers()) {
            Ok(()) => {
                let name = name.trim().to_string();
                self.notifier
                    .notify(&format!("File saved as: \"{}\"", name), Severity::Success);
                self.current_file = Some(name);
                true
            }
            Err(e) => {
                self.notifier.notify(&format!("Save failed: {}", e), Severity::Error);
                false
            }
        }
    }

    /// Replace every buffer with the contents of a saved file. The swap is
    /// one history step, so it can be undone.
    pub fn open(&mut self, name: &str) -> bool {
        let set = match self.store.open(name) {
            Ok(set) => set,
            Err(e) => {
                self.notifier.notify(&format!("Open failed: {}", e), Severity::Error);
                return false;
            }
        };

        self.after_render();
        let count = set.len();
        self.buffers.replace_all(set);
        self.focus.reconcile(self.buffers.buffers());
        self.sync_styles();

        let name = name.trim().to_string();
        self.notifier.notify(
            &format!("Opened \"{}\" ({} buffer(s))", name, count),
            Severity::Info,
        );
        self.current_file = Some(name);
        true
    }

    pub fn delete_file(&mut self, name: &str) -> bool {
        match self.store.delete(name) {
            Ok(()) => {
                let name = name.trim();
                self.notifier
                    .notify(&format!("Deleted \"{}\"", name), Severity::Info);
                if self.current_file.as_deref() == Some(name) {
                    self.current_file = None;
                }
                true
            }
            Err(e) => {
                self.notifier.notify(&format!("Delete failed: {}", e), Severity::Error);
                false
            }
        }
    }

    pub fn saved_files(&self) -> Vec<String> {
        match self.store.list() {
            Ok(names) => names,
            Err(e) => {
                self.notifier
                    .notify(&format!("Could not list files: {}", e), Severity::Warning);
                Vec::new()
            }
        }
    }

    /// Keep one presentation style per buffer after the count changed.
    fn sync_styles(&mut self) {
        let count = self.buffers.count();
        self.styles.resize(count, self.default_style.clone());
    }
}
