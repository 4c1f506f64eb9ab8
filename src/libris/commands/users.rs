use crate::catalog::Library;
use crate::commands::{check_amount, check_field, check_key, CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};
use crate::model::{Profile, User};

pub fn add(library: &mut Library, user: User) -> Result<CmdResult> {
    check_key("user id", user.id())?;
    check_field("name", user.name())?;
    match user.profile() {
        Profile::Student { major } => check_field("major", major)?,
        Profile::Teacher { department } => check_field("department", department)?,
        Profile::Base { .. } => {}
    }
    library.add_user(user.clone())?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} added: {} ({})",
        user.user_type().label(),
        user.name(),
        user.id()
    )));
    Ok(result.with_users(vec![user]))
}

/// Removes a user. Open loans and unpaid fees are reported, not enforced.
pub fn remove(library: &mut Library, id: &str) -> Result<CmdResult> {
    let open_loans = library.active_loans_for_user(id);
    let user = library.remove_user(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "User removed: {} ({})",
        user.name(),
        user.id()
    )));
    if open_loans > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} open loan(s) still reference {}",
            open_loans, id
        )));
    }
    if user.fees_due() > 0.0 {
        result.add_message(CmdMessage::warning(format!(
            "Unpaid fees of ${:.2} were dropped with the user",
            user.fees_due()
        )));
    }
    Ok(result.with_users(vec![user]))
}

pub fn show(library: &Library, id: &str) -> Result<CmdResult> {
    let user = library
        .search_user(id)
        .ok_or_else(|| LibrisError::UserNotFound(id.to_string()))?;
    Ok(CmdResult::default().with_users(vec![user.clone()]))
}

pub fn list(library: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_users(library.users().to_vec());
    if result.users.is_empty() {
        result.add_message(CmdMessage::info("No users registered."));
    }
    Ok(result)
}

pub fn charge(library: &mut Library, id: &str, amount: f64) -> Result<CmdResult> {
    check_amount(amount)?;
    let user = library.charge_fees(id, amount)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Charged ${:.2} to {}: ${:.2} due",
        amount,
        user.id(),
        user.fees_due()
    )));
    Ok(result.with_users(vec![user]))
}

pub fn pay(library: &mut Library, id: &str, amount: f64) -> Result<CmdResult> {
    check_amount(amount)?;
    let user = library.pay_fees(id, amount)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Received ${:.2} from {}: ${:.2} due",
        amount,
        user.id(),
        user.fees_due()
    )));
    Ok(result.with_users(vec![user]))
}
