use std::path::PathBuf;

use log::debug;

use crate::models::{
    Application, ApplicationCreate, ApplicationList, LinkFilter, ListQuery, SortOrder, Stats,
    Status,
};
use crate::state::{DashboardState, LOAD_ERROR, LoadState, Notice, PendingUndo};

#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    CycleStatus { forward: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Dashboard opened; issue the first load.
    Started,
    /// Manual refresh: back to page 1 and reload.
    Refresh,

    StartSearch,
    EndSearch,
    QueryChanged(String),
    /// Debounce timer fired for the given search edit.
    SearchSettled { token: u64 },
    StatusFilterChanged(Option<Status>),
    LinkFilterChanged(LinkFilter),
    SortOrderChanged(SortOrder),
    NextPage,
    PrevPage,
    SelectNext,
    SelectPrev,

    Loaded {
        generation: u64,
        result: Result<(Stats, ApplicationList), String>,
    },

    OpenForm,
    CloseForm,
    Form(FormInput),
    SubmitForm,
    Created(Result<Application, String>),

    SetStatus { id: i64, status: Status },
    StatusUpdated(Result<Application, String>),

    RequestDelete(i64),
    CancelDelete,
    ConfirmDelete,
    Deleted { id: i64, result: Result<Application, String> },
    Undo,
    UndoExpired { token: u64 },
    Restored(Result<Application, String>),

    Export,
    Exported { rows: usize, result: Result<PathBuf, String> },

    DismissNotice,
    Quit,
}

/// Side effects requested by `update`; run by the dashboard runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load { generation: u64, query: ListQuery },
    ScheduleSearch { token: u64 },
    Create(ApplicationCreate),
    UpdateStatus { id: i64, status: Status },
    Delete { id: i64 },
    Restore { id: i64 },
    StartUndoTimer { token: u64 },
    CancelUndoTimer,
    Export(Vec<Application>),
}

/// Applies a message to the state and returns the effects to run.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![begin_load(&mut state)],
        Msg::Refresh => {
            state.filters.page = 1;
            vec![begin_load(&mut state)]
        }

        Msg::StartSearch => {
            state.searching = true;
            Vec::new()
        }
        Msg::EndSearch => {
            state.searching = false;
            if state.search_pending {
                // Flush now; the pending timer becomes stale.
                state.search_pending = false;
                state.search_token += 1;
                vec![begin_load(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::QueryChanged(query) => {
            if query == state.filters.query {
                return (state, Vec::new());
            }
            state.filters.query = query;
            state.filters.page = 1;
            state.search_pending = true;
            state.search_token += 1;
            // Anything in flight was issued for the old query.
            state.generation += 1;
            state.load = LoadState::Loading;
            vec![Effect::ScheduleSearch {
                token: state.search_token,
            }]
        }
        Msg::SearchSettled { token } => {
            if token == state.search_token && state.search_pending {
                state.search_pending = false;
                vec![begin_load(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::StatusFilterChanged(status) => {
            if status == state.filters.status {
                return (state, Vec::new());
            }
            state.filters.status = status;
            state.filters.page = 1;
            vec![begin_load(&mut state)]
        }
        Msg::LinkFilterChanged(link) => {
            if link == state.filters.link {
                return (state, Vec::new());
            }
            state.filters.link = link;
            state.filters.page = 1;
            vec![begin_load(&mut state)]
        }
        Msg::SortOrderChanged(order) => {
            if order == state.filters.sort_order {
                return (state, Vec::new());
            }
            state.filters.sort_order = order;
            state.filters.page = 1;
            vec![begin_load(&mut state)]
        }
        Msg::NextPage => {
            if state.filters.page < state.total_pages() {
                state.filters.page += 1;
                vec![begin_load(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::PrevPage => {
            if state.filters.page > 1 {
                state.filters.page -= 1;
                vec![begin_load(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::SelectNext => {
            if state.selected + 1 < state.applications.len() {
                state.selected += 1;
            }
            Vec::new()
        }
        Msg::SelectPrev => {
            state.selected = state.selected.saturating_sub(1);
            Vec::new()
        }

        Msg::Loaded { generation, result } => apply_loaded(&mut state, generation, result),

        Msg::OpenForm => {
            state.form_open = true;
            Vec::new()
        }
        Msg::CloseForm => {
            state.form_open = false;
            Vec::new()
        }
        Msg::Form(input) => {
            match input {
                FormInput::Char(c) => state.form.insert_char(c),
                FormInput::Backspace => state.form.backspace(),
                FormInput::NextField => state.form.focus_next(),
                FormInput::PrevField => state.form.focus_prev(),
                FormInput::CycleStatus { forward } => state.form.cycle_status(forward),
            }
            Vec::new()
        }
        Msg::SubmitForm => {
            if state.submitting {
                return (state, Vec::new());
            }
            match state.form.to_payload() {
                Ok(payload) => {
                    state.submitting = true;
                    state.form.error = None;
                    vec![Effect::Create(payload)]
                }
                Err(err) => {
                    state.form.error = Some(err);
                    Vec::new()
                }
            }
        }
        Msg::Created(result) => {
            state.submitting = false;
            match result {
                Ok(app) => {
                    state.form = state.form.reset_keeping_date();
                    state.notice = Some(Notice::info(format!(
                        "Added {} - {}",
                        app.company, app.role
                    )));
                    state.filters.page = 1;
                    vec![begin_load(&mut state)]
                }
                Err(err) => {
                    state.notice = Some(Notice::error(format!(
                        "Could not add application: {}",
                        err
                    )));
                    Vec::new()
                }
            }
        }

        Msg::SetStatus { id, status } => match state.application(id) {
            Some(app) if app.status == status => Vec::new(),
            _ => vec![Effect::UpdateStatus { id, status }],
        },
        Msg::StatusUpdated(result) => match result {
            Ok(_) => vec![begin_load(&mut state)],
            Err(err) => {
                state.notice = Some(Notice::error(format!(
                    "Could not update status: {}",
                    err
                )));
                Vec::new()
            }
        },

        Msg::RequestDelete(id) => {
            state.confirm_delete = Some(id);
            Vec::new()
        }
        Msg::CancelDelete => {
            state.confirm_delete = None;
            Vec::new()
        }
        Msg::ConfirmDelete => match state.confirm_delete.take() {
            Some(id) => vec![Effect::Delete { id }],
            None => Vec::new(),
        },
        Msg::Deleted { id, result } => match result {
            Ok(app) => {
                // Replaces any earlier pending undo; that one is not restored.
                state.undo_token += 1;
                state.undo = Some(PendingUndo {
                    id,
                    company: app.company,
                    token: state.undo_token,
                });
                vec![
                    Effect::StartUndoTimer {
                        token: state.undo_token,
                    },
                    begin_load(&mut state),
                ]
            }
            Err(err) => {
                state.notice = Some(Notice::error(format!(
                    "Could not delete application: {}",
                    err
                )));
                Vec::new()
            }
        },
        Msg::Undo => match state.undo.take() {
            Some(pending) => vec![Effect::CancelUndoTimer, Effect::Restore { id: pending.id }],
            None => Vec::new(),
        },
        Msg::UndoExpired { token } => {
            if state.undo.as_ref().is_some_and(|p| p.token == token) {
                state.undo = None;
            }
            Vec::new()
        }
        Msg::Restored(result) => match result {
            Ok(app) => {
                state.notice = Some(Notice::info(format!("Restored {}", app.company)));
                vec![begin_load(&mut state)]
            }
            Err(err) => {
                state.notice = Some(Notice::error(format!(
                    "Could not restore application: {}",
                    err
                )));
                Vec::new()
            }
        },

        Msg::Export => vec![Effect::Export(state.applications.clone())],
        Msg::Exported { rows, result } => {
            state.notice = Some(match result {
                Ok(path) => Notice::info(format!("Exported {} rows to {}", rows, path.display())),
                Err(err) => Notice::error(format!("Export failed: {}", err)),
            });
            Vec::new()
        }

        Msg::DismissNotice => {
            state.notice = None;
            Vec::new()
        }
        Msg::Quit => {
            state.should_quit = true;
            Vec::new()
        }
    };

    (state, effects)
}

fn begin_load(state: &mut DashboardState) -> Effect {
    state.generation += 1;
    state.load = LoadState::Loading;
    state.error = None;
    Effect::Load {
        generation: state.generation,
        query: state.filters.to_query(),
    }
}

fn apply_loaded(
    state: &mut DashboardState,
    generation: u64,
    result: Result<(Stats, ApplicationList), String>,
) -> Vec<Effect> {
    if generation != state.generation {
        debug!(
            "Dropping stale load result (generation {}, latest {})",
            generation, state.generation
        );
        return Vec::new();
    }

    match result {
        Ok((stats, list)) => {
            state.stats = stats;
            state.applications = list.items;
            state.total = list.total;
            state.load = LoadState::Loaded;
            state.selected = state
                .selected
                .min(state.applications.len().saturating_sub(1));

            let last_page = state.total_pages();
            if state.filters.page > last_page {
                state.filters.page = last_page;
                return vec![begin_load(state)];
            }
            Vec::new()
        }
        Err(err) => {
            debug!("Load failed: {}", err);
            state.error = Some(LOAD_ERROR.to_string());
            state.load = LoadState::Error;
            Vec::new()
        }
    }
}
