//! The process-wide session context.
//!
//! [`SessionProvider`] creates the one [`AppSession`], resolves it on mount
//! and tears it down on unmount. Views read it through [`use_session`].

use api::{Action, SessionState};
use dioxus::prelude::*;

use crate::hooks::use_watch;
use crate::platform::{make_client, AppClient, AppSession};

#[derive(Clone)]
pub struct SessionContext {
    session: AppSession,
    state: Signal<SessionState>,
}

impl SessionContext {
    pub fn session(&self) -> &AppSession {
        &self.session
    }

    pub fn client(&self) -> AppClient {
        self.session.client().clone()
    }

    /// Subscribes the reading component to session changes.
    pub fn state(&self) -> SessionState {
        (self.state)()
    }

    pub fn can(&self, action: Action) -> bool {
        self.state().can(action)
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

#[component]
pub fn SessionProvider(children: Element) -> Element {
    let session = use_hook(|| AppSession::new(make_client()));
    let state = use_watch({
        let session = session.clone();
        move || session.subscribe()
    });

    use_hook({
        let session = session.clone();
        move || {
            spawn(async move {
                let resolved = session.resolve().await;
                tracing::debug!(?resolved, "session resolved");
            });
        }
    });

    use_drop({
        let session = session.clone();
        move || session.teardown()
    });

    use_context_provider(|| SessionContext {
        session: session.clone(),
        state,
    });

    rsx! {
        {children}
    }
}
