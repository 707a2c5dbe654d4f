use crate::cli::CreateUserArgs;
use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::services::{AccountService, Registration};
use crate::types::internal::context::RequestContext;

/// Create an account from the command line
///
/// Runs the same validation as self-registration. The password is taken
/// once and used as both password and confirmation.
pub async fn create_user(
    accounts: &AccountService,
    args: CreateUserArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create-user");

    let created_by = match &args.created_by {
        Some(email) => match accounts.get_by_email(email).await? {
            Some(creator) => Some(creator.id),
            None => {
                println!("❌ Error: No user with email {}.", email);
                return Err(format!("Creator not found: {}", email).into());
            }
        },
        None => None,
    };

    let registration = Registration {
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        national_id: args.national_id,
        phone_number: args.phone,
        role: Some(args.role),
        department: args.department,
        password1: args.password.clone(),
        password2: args.password,
    };

    match accounts.create_user(&ctx, registration, created_by).await {
        Ok(user) => {
            println!("✅ User created.");
            println!("   {} <{}>", user.full_name(), user.email);
            println!("   Role: {}  Department: {}", user.role, user.department);
            if let Some(employee_id) = &user.employee_id {
                println!("   Employee ID: {}", employee_id);
            }
            Ok(())
        }
        Err(InternalError::Account(AccountError::Validation(errors))) => {
            println!("❌ The user could not be created:");
            for (field, messages) in errors.fields() {
                for message in messages {
                    println!("   {}: {}", field, message);
                }
            }
            Err("Validation failed".into())
        }
        Err(e) => Err(e.into()),
    }
}
