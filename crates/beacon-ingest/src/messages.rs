//! Title/body template table for every recognised event.
//!
//! Text is opaque to the rest of the system; swapping this module out is the
//! localisation seam.

// ─── Tenant builders ─────────────────────────────────────────────────────────

pub fn tenant_created(display_name: &str, db_type: &str) -> (String, String) {
    (
        "New tenant provisioned".to_string(),
        format!("Tenant '{display_name}' (DB: {db_type}) was created successfully."),
    )
}

pub fn tenant_updated(display_name: &str) -> (String, String) {
    (
        "Tenant updated".to_string(),
        format!("Configuration of tenant '{display_name}' was updated."),
    )
}

pub fn tenant_status_updated(tenant_key: &str, status: &str) -> (String, String) {
    (
        "Tenant status changed".to_string(),
        format!("Status of tenant '{tenant_key}' changed to {status}."),
    )
}

pub fn tenant_deleted(tenant_key: &str) -> (String, String) {
    (
        "Tenant deleted".to_string(),
        format!("Tenant '{tenant_key}' was removed from the platform."),
    )
}

// ─── BPM builders ────────────────────────────────────────────────────────────

pub fn task_assigned(task_name: &str, process_name: &str) -> (String, String) {
    (
        format!("New task: {task_name}"),
        format!("You were assigned '{task_name}' in process '{process_name}'."),
    )
}

pub fn task_completed(task_name: &str) -> (String, String) {
    (
        "Task completed".to_string(),
        format!("Task '{task_name}' has been completed."),
    )
}

pub fn approval_required(task_name: &str, process_name: &str) -> (String, String) {
    (
        "Approval required".to_string(),
        format!("Your approval is needed for '{task_name}' in process '{process_name}'."),
    )
}

// ─── CRM builders ────────────────────────────────────────────────────────────

pub fn lead_status_changed(entity_name: &str) -> (String, String) {
    (
        "Lead status changed".to_string(),
        format!("Status of lead '{entity_name}' was updated."),
    )
}

pub fn deal_updated(entity_name: &str) -> (String, String) {
    (
        "Deal updated".to_string(),
        format!("Deal '{entity_name}' was just updated."),
    )
}

// ─── IAM builders ────────────────────────────────────────────────────────────

pub fn login_new_device(ip: &str) -> (String, String) {
    (
        "Sign-in from a new device".to_string(),
        format!(
            "Your account was accessed from a new device (IP: {ip}). \
             If this was not you, change your password immediately."
        ),
    )
}

pub fn password_changed() -> (String, String) {
    (
        "Password changed".to_string(),
        "Your account password was just changed. Contact an administrator \
         if you did not perform this action."
            .to_string(),
    )
}
