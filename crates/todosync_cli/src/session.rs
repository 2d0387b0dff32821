//! Interactive session over either list variant.
//!
//! # Responsibility
//! - Route parsed commands to the remote controller or the in-memory list.
//! - Pump store notifications after every remote command so the printed
//!   view reflects the echo.

use crate::command::Command;
use crate::render::render_view;
use todosync_core::{
    InMemoryDocumentStore, ListView, LocalTodoList, SortAxis, TodoListController, TodoSyncConfig,
};

pub enum Session {
    Remote {
        store: InMemoryDocumentStore,
        controller: TodoListController<InMemoryDocumentStore>,
    },
    Local(LocalTodoList),
}

/// What the loop should do after one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

impl Session {
    /// Starts the remote variant on a fresh in-process store.
    pub fn remote(config: &TodoSyncConfig) -> Result<Self, String> {
        let store = InMemoryDocumentStore::new();
        let controller = TodoListController::from_config(store.clone(), config)
            .map_err(|err| err.to_string())?;
        store.deliver_pending();
        Ok(Self::Remote { store, controller })
    }

    pub fn local(list: LocalTodoList) -> Self {
        Self::Local(list)
    }

    pub fn view(&self) -> ListView {
        match self {
            Self::Remote { controller, .. } => controller.view(),
            Self::Local(list) => list.view(),
        }
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        let message = match command {
            Command::Quit => return Outcome::Quit,
            Command::Help => return Outcome::Print(crate::command::HELP.to_string()),
            Command::List => None,
            other => match self {
                Self::Remote { store, controller } => {
                    let message = run_remote(controller, other);
                    store.deliver_pending();
                    message
                }
                Self::Local(list) => run_local(list, other),
            },
        };

        let rendered = render_view(&self.view());
        Outcome::Print(match message {
            Some(message) => format!("{message}\n{rendered}"),
            None => rendered,
        })
    }

    /// Releases the remote subscription; no-op for the in-memory list.
    pub fn close(&mut self) {
        if let Self::Remote { controller, .. } = self {
            controller.dispose();
        }
    }
}

fn run_remote(
    controller: &TodoListController<InMemoryDocumentStore>,
    command: Command,
) -> Option<String> {
    let result = match command {
        Command::Add(title) => controller.create(&title).map(|id| match id {
            Some(id) => Some(format!("created {id}")),
            None => Some("ignored blank title".to_string()),
        }),
        Command::Toggle(id) => match controller.item(&id) {
            Some(item) => controller.toggle_complete(&id, item.completed).map(|()| None),
            None => return Some(format!("unknown id {id}")),
        },
        Command::Delete(id) => controller.delete(&id).map(|()| None),
        Command::Filter(filter) => {
            controller.select_filter(filter);
            Ok(None)
        }
        Command::Sort(SortAxis::Title) => {
            controller.click_title_sort();
            Ok(None)
        }
        Command::Sort(SortAxis::Time) => {
            controller.click_time_sort();
            Ok(None)
        }
        Command::Draft(text) => {
            controller.set_draft(text);
            Ok(None)
        }
        Command::Submit => controller
            .submit_draft()
            .map(|id| id.map(|id| format!("created {id}"))),
        Command::Dismiss => {
            controller.dismiss_error();
            Ok(None)
        }
        Command::List | Command::Help | Command::Quit => Ok(None),
    };
    // Failures are already recorded in the view's last error.
    result.ok().flatten()
}

fn run_local(list: &mut LocalTodoList, command: Command) -> Option<String> {
    match command {
        Command::Add(title) => Some(match list.create(&title) {
            Some(id) => format!("created {id}"),
            None => "ignored blank title".to_string(),
        }),
        Command::Toggle(id) => (!list.toggle_complete(&id)).then(|| format!("unknown id {id}")),
        Command::Delete(id) => (!list.delete(&id)).then(|| format!("unknown id {id}")),
        Command::Filter(filter) => {
            list.select_filter(filter);
            None
        }
        Command::Sort(SortAxis::Title) => {
            list.click_title_sort();
            None
        }
        Command::Sort(SortAxis::Time) => {
            list.click_time_sort();
            Some("time sort is unavailable for this list".to_string())
        }
        Command::Draft(text) => {
            list.set_draft(text);
            None
        }
        Command::Submit => list.submit_draft().map(|id| format!("created {id}")),
        Command::Dismiss => {
            list.dismiss_error();
            None
        }
        Command::List | Command::Help | Command::Quit => None,
    }
}
