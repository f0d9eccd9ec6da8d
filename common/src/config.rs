use std::{collections::HashMap, path::Path};

use anyhow::{anyhow, Context, Result};
use hocon::{Hocon, HoconLoader};
use log::debug;

/// Reads settings from a HOCON document.
///
/// A key is resolved in order from:
/// 1. the environment variable `<SCOPE>_<KEY>` in upper case,
/// 2. the object named by `scope`,
/// 3. the root of the document.
#[derive(Debug)]
pub struct ConfigLoader {
    hocon: Hocon,
    env: HashMap<String, String>,
    scope: String,
}

impl ConfigLoader {
    pub fn new(path: impl AsRef<Path>, scope: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(anyhow!("The config file {:?} was not found", path));
        }

        let hocon = HoconLoader::new()
            .load_file(path)
            .with_context(|| format!("Failed to load config file at: {:?}", path))?
            .hocon()
            .with_context(|| format!("Failed to parse config file at: {:?}", path))?;

        debug!("Loaded config {:?} with scope '{}'", path, scope);

        Ok(Self::from_hocon(hocon, scope))
    }

    pub fn parse(config: &str, scope: &str) -> Result<Self> {
        let hocon = HoconLoader::new()
            .load_str(config)
            .context("Failed to load config")?
            .hocon()
            .context("Failed to parse config")?;

        Ok(Self::from_hocon(hocon, scope))
    }

    fn from_hocon(hocon: Hocon, scope: &str) -> Self {
        let env = std::env::vars().collect::<HashMap<_, _>>();

        Self {
            hocon,
            env,
            scope: scope.to_string(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.env.get(&self.env_key(name)) {
            return Some(Value::String(value.clone()));
        }

        let scope = &self.hocon[self.scope.as_str()];
        if matches!(scope, Hocon::Hash(_)) {
            if let Some(value) = Self::map_hocon(scope, name) {
                return Some(value);
            }
        }

        Self::map_hocon(&self.hocon, name)
    }

    pub fn load<T: Config>(&self) -> Result<T> {
        T::load(self).with_context(|| format!("Failed to load config scope '{}'", self.scope))
    }

    fn env_key(&self, name: &str) -> String {
        format!("{}_{}", self.scope, name)
            .replace(['-', '.'], "_")
            .to_uppercase()
    }

    fn map_hocon(hocon: &Hocon, name: &str) -> Option<Value> {
        match &hocon[name] {
            Hocon::Real(real) => Some(Value::Float(*real as f32)),
            Hocon::Integer(integer) if *integer >= 0 => Some(Value::Integer(*integer as usize)),
            Hocon::Integer(integer) => Some(Value::Float(*integer as f32)),
            Hocon::String(string) => Some(Value::String(string.clone())),
            Hocon::Boolean(bool) => Some(Value::Boolean(*bool)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(usize),
    Float(f32),
    Boolean(bool),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(val) => Some(*val),
            Value::String(val) => match val.to_lowercase().as_str() {
                "true" | "yes" | "on" => Some(true),
                "false" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(val) => Some(*val),
            Value::String(val) => val.parse::<usize>().ok(),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Integer(val) => Some(*val as f32),
            Value::String(val) => val.parse::<f32>().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            Value::Boolean(val) => Some(val.to_string()),
            Value::Float(val) => Some(val.to_string()),
            Value::Integer(val) => Some(val.to_string()),
        }
    }
}

pub trait Config {
    fn load(config: &ConfigLoader) -> Result<Self>
    where
        Self: Sized;
}
