//! Shipped Gearplan tools: the equipment upgrade calculator and the jewel
//! calculator, with their master data and field schemas.
//!
//! Frontends call [`register_builtin_tools`] once at startup. The equipment
//! tool registers first and is therefore the default selection.

pub mod equipment;
pub mod jewel;

use gearplan_core::engine::{Engine, EngineError, ToolWarning};

/// Register every built-in tool, in display order.
pub fn register_builtin_tools(engine: &mut Engine) -> Result<Vec<ToolWarning>, EngineError> {
    let mut warnings = engine.register(equipment::equipment_tool()?)?;
    warnings.extend(engine.register(jewel::jewel_tool()?)?);
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_cleanly() {
        let mut engine = Engine::new();
        let warnings = register_builtin_tools(&mut engine).unwrap();
        assert!(warnings.is_empty());

        let ids: Vec<&str> = engine.tools().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["equipment", "jewel"]);
    }

    #[test]
    fn reregistering_builtins_fails_and_keeps_originals() {
        let mut engine = Engine::new();
        register_builtin_tools(&mut engine).unwrap();

        let result = register_builtin_tools(&mut engine);
        assert!(matches!(result, Err(EngineError::DuplicateTool(_))));
        assert_eq!(engine.tool_count(), 2);
    }
}
