//! Effect runner: one command, one collaborator call, one terminal action.

use store_core::{Action, Command};
use store_types::{failure_message, Entity};
use tracing::{debug, warn};

use crate::collaborator::{Collaborator, CollaboratorError};

/// Run `command` against the collaborator and describe how it ended.
///
/// Never fails: collaborator errors become failure actions carrying the
/// classified display message.
pub async fn run<E, C>(collaborator: &C, command: &Command<E>) -> Action<E>
where
    E: Entity,
    C: Collaborator<E> + ?Sized,
{
    debug!(kind = E::KIND, operation = ?command.operation(), "running effect");

    match command {
        Command::List(query) => match collaborator.list(query).await {
            Ok(page) => Action::LoadListSuccess(page),
            Err(e) => Action::LoadListFailure(failed::<E>(command, e)),
        },
        Command::Get(id) => match collaborator.get(id).await {
            Ok(entity) => Action::LoadOneSuccess(entity),
            Err(e) => Action::LoadOneFailure(failed::<E>(command, e)),
        },
        Command::Create(input) => match collaborator.create(input).await {
            Ok(entity) => Action::CreateSuccess(entity),
            Err(e) => Action::CreateFailure(failed::<E>(command, e)),
        },
        Command::Update(id, input) => match collaborator.update(id, input).await {
            Ok(entity) => Action::UpdateSuccess(entity),
            Err(e) => Action::UpdateFailure(failed::<E>(command, e)),
        },
        Command::Delete(id) => match collaborator.delete(id).await {
            Ok(()) => Action::DeleteSuccess(id.clone()),
            Err(e) => Action::DeleteFailure(failed::<E>(command, e)),
        },
        Command::Transition(id, transition) => {
            match collaborator.transition(id, transition).await {
                Ok(entity) => Action::TransitionSuccess(entity),
                Err(e) => Action::TransitionFailure(failed::<E>(command, e)),
            }
        }
    }
}

fn failed<E: Entity>(command: &Command<E>, error: CollaboratorError) -> String {
    warn!(
        kind = E::KIND,
        operation = ?command.operation(),
        error = %error,
        "collaborator call failed"
    );
    failure_message(error.status(), &error.to_string())
}
