use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::core::registration::RegistrationForm;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Register {
        email,
        employee_id,
        password,
        confirm_password,
    } = cmd
    {
        let form = RegistrationForm {
            email: email.clone(),
            employee_id: employee_id.clone(),
            password: password.clone(),
            confirm_password: confirm_password.clone(),
        };

        let profile = ctx.registration().register(&form).await?;

        success(format!(
            "Account created for {} (role: {})",
            profile.email,
            profile.role.as_str()
        ));

        ctx.audit("register", &profile.uid, &profile.email).await;
    }
    Ok(())
}
