use serde_json::json;

use crate::app::AppContext;
use crate::cli::{emit_json, fail};
use crate::error::{KanbanError, ErrorCode};
use crate::identity::IdentityService;
use crate::output;
use crate::validation::SignUpForm;

pub fn signup(form: SignUpForm, json_output: bool) -> i32 {
    let result = (|| -> Result<i32, KanbanError> {
        let mut ctx = AppContext::open()?;
        let user = ctx.identity.sign_up(&form)?;
        // Seed the default columns right away.
        ctx.board()?.close();
        if json_output {
            emit_json(&output::json::success(json!({ "user": output::json::user_json(&user) })));
        } else {
            println!("Signed up as {} <{}>", user.display_name, user.email);
        }
        Ok(0)
    })();
    result.unwrap_or_else(|e| fail(&e, json_output))
}

pub fn login(email: &str, password: &str, json_output: bool) -> i32 {
    let result = (|| -> Result<i32, KanbanError> {
        let mut ctx = AppContext::open()?;
        let user = ctx.identity.login(email, password)?;
        if json_output {
            emit_json(&output::json::success(json!({ "user": output::json::user_json(&user) })));
        } else {
            println!("Signed in as {} <{}>", user.display_name, user.email);
        }
        Ok(0)
    })();
    result.unwrap_or_else(|e| fail(&e, json_output))
}

pub fn logout(json_output: bool) -> i32 {
    let result = (|| -> Result<i32, KanbanError> {
        let mut ctx = AppContext::open()?;
        let was_signed_in = ctx.identity.current_user().is_some();
        ctx.identity.sign_out()?;
        if json_output {
            emit_json(&output::json::success(json!({ "signed_out": was_signed_in })));
        } else if was_signed_in {
            println!("Signed out");
        } else {
            println!("Not signed in");
        }
        Ok(0)
    })();
    result.unwrap_or_else(|e| fail(&e, json_output))
}

pub fn whoami(json_output: bool) -> i32 {
    let result = (|| -> Result<i32, KanbanError> {
        let ctx = AppContext::open()?;
        let user = ctx
            .identity
            .current_user()
            .ok_or_else(KanbanError::not_authenticated)?;
        if json_output {
            emit_json(&output::json::success(json!({ "user": output::json::user_json(user) })));
        } else {
            output::text::print_user(user);
        }
        Ok(0)
    })();
    match result {
        Ok(code) => code,
        Err(e) if e.code == ErrorCode::NotAuthenticated && !json_output => {
            eprintln!("Not signed in");
            1
        }
        Err(e) => fail(&e, json_output),
    }
}
