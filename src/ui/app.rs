use crate::book::BudgetBook;
use crate::models::{ItemError, Schema};
use crate::session::{EditSession, ItemFilter};
use crate::sheet::SheetError;
use crate::summary::Summary;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Items,
    Summary,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Items, Self::Summary]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Items => write!(f, "Items"),
            Self::Summary => write!(f, "Summary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingAction {
    Save,
    Reload,
    Quit,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) sheet_title: String,
    pub(crate) schema: Schema,

    // Items
    pub(crate) session: EditSession,
    pub(crate) filter: ItemFilter,
    pub(crate) load_error: Option<String>,
    pub(crate) item_index: usize,
    pub(crate) item_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(book: &BudgetBook) -> Self {
        Self {
            running: true,
            screen: Screen::Items,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            sheet_title: book.title().to_string(),
            schema: book.schema(),

            session: EditSession::default(),
            filter: ItemFilter::All,
            load_error: None,
            item_index: 0,
            item_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Replace the session with the book's current table.
    ///
    /// `force` drops the cached snapshot first. On failure the grid is
    /// emptied and the error kept, so nothing stale is shown or saved.
    pub(crate) fn reload(&mut self, book: &mut BudgetBook, force: bool) {
        if force {
            book.refresh();
        }
        match book.load() {
            Ok(table) => {
                self.session = EditSession::from_table(&table);
                self.load_error = None;
                self.clamp_cursor();
                log::debug!("Loaded {} items into the editor", table.len());
            }
            Err(e) => {
                let message = describe_error(&e);
                log::warn!("Load failed: {e:#}");
                self.session = EditSession::default();
                self.load_error = Some(message.clone());
                self.item_index = 0;
                self.item_scroll = 0;
                self.set_status(message);
            }
        }
    }

    /// Write every row without a delete mark back to the book.
    pub(crate) fn save(&mut self, book: &mut BudgetBook) {
        if !self.writable() {
            self.set_status("Data unavailable. Reload with r before saving");
            return;
        }
        let items = self.session.items_to_save();
        let deleted = self.session.deleted_count();
        match book.save_all(&items) {
            Ok(()) => {
                self.reload(book, true);
                let mut msg = format!("Saved {} items", items.len());
                if deleted > 0 {
                    msg.push_str(&format!(" ({deleted} deleted)"));
                }
                self.set_status(msg);
            }
            Err(e) => {
                // Edits stay in the session so the save can be retried.
                self.set_status(format!("Save failed: {}", describe_error(&e)));
            }
        }
    }

    pub(crate) fn writable(&self) -> bool {
        self.load_error.is_none()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    /// Session indices of the rows the current filter shows.
    pub(crate) fn visible(&self) -> Vec<usize> {
        self.session.visible(self.filter)
    }

    /// Session index of the row under the cursor.
    pub(crate) fn selected(&self) -> Option<usize> {
        self.visible().get(self.item_index).copied()
    }

    /// Totals over what a save would write, including unsaved edits.
    pub(crate) fn summary(&self) -> Summary {
        Summary::from_items(&self.session.items_to_save())
    }

    pub(crate) fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = filter;
        self.item_index = 0;
        self.item_scroll = 0;
    }

    /// Run `edit` on the selected row, reporting why it could not run.
    pub(crate) fn edit_selected(
        &mut self,
        edit: impl FnOnce(&mut EditSession, usize) -> Result<String, ItemError>,
    ) {
        if !self.writable() {
            self.set_status("Data unavailable. Reload with r before editing");
            return;
        }
        let Some(idx) = self.selected() else {
            self.set_status("No item selected");
            return;
        };
        match edit(&mut self.session, idx) {
            Ok(msg) => self.set_status(msg),
            Err(e) => self.set_status(e.to_string()),
        }
        self.clamp_cursor();
    }

    pub(crate) fn move_down(&mut self) {
        let len = self.visible().len();
        let page = self.visible_rows.max(1);
        scroll_down(&mut self.item_index, &mut self.item_scroll, len, page);
    }

    pub(crate) fn move_up(&mut self) {
        scroll_up(&mut self.item_index, &mut self.item_scroll);
    }

    pub(crate) fn goto_top(&mut self) {
        scroll_to_top(&mut self.item_index, &mut self.item_scroll);
    }

    pub(crate) fn goto_bottom(&mut self) {
        let len = self.visible().len();
        let page = self.visible_rows.max(1);
        scroll_to_bottom(&mut self.item_index, &mut self.item_scroll, len, page);
    }

    /// Keep the cursor on a visible row after the row set changes.
    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if self.item_index >= len {
            self.item_index = len.saturating_sub(1);
        }
        if self.item_scroll > self.item_index {
            self.item_scroll = self.item_index;
        }
    }

    pub(crate) fn confirm(&mut self, action: PendingAction, message: impl Into<String>) {
        self.pending_action = Some(action);
        self.confirm_message = message.into();
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

/// One-line description of a failure, naming the store when it is the cause.
pub(crate) fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SheetError>() {
        Some(e) if e.is_connection() => format!("Data unavailable. {e}"),
        Some(e) => e.to_string(),
        None => format!("{err:#}"),
    }
}
