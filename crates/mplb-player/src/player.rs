use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mplb_channel::{LaunchSpec, LineIo, PlayerProcess};
use mplb_schema::{Schema, Value};

use crate::dispatch::{dispatch, Pausing};
use crate::error::{PlayerError, Result};
use crate::property::{self, PropertyValue};

/// Name binding options for a player.
///
/// Prefixes exist because the discovered command and property namespaces
/// overlap (e.g. a `loop` property and a hypothetical `loop` command);
/// binding both under distinct prefixes makes the collision avoidable.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Prefix for bound command names.
    pub method_prefix: String,
    /// Prefix for bound property names.
    pub property_prefix: String,
    /// Pausing mode used by every operation.
    pub pausing: Pausing,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            method_prefix: String::new(),
            property_prefix: "p_".to_string(),
            pausing: Pausing::default(),
        }
    }
}

/// What a bound name points at.
#[derive(Clone, Copy, Debug)]
enum Binding {
    Command(usize),
    Property(usize),
}

/// A typed proxy over one live slave-mode player process.
///
/// Every discovered command is invocable by its prefixed name, every
/// discovered property readable/writable by its prefixed name, all checked
/// against the shared [`Schema`] before touching the wire.
///
/// The slave protocol has no request correlation, so a `get_` write and its
/// reply read must be one atomic transaction. The channel sits behind a
/// mutex: concurrent callers serialize per player, and the schema stays
/// freely shared.
///
/// A player is Open from successful launch until [`Player::close`] or a
/// detected disconnect; Closed is irreversible and every operation on a
/// closed player fails with [`PlayerError::Closed`]. Dropping the player
/// terminates the process.
#[derive(Debug)]
pub struct Player<C: LineIo = PlayerProcess> {
    schema: Arc<Schema>,
    bindings: HashMap<String, Binding>,
    config: PlayerConfig,
    get_property_cmd: usize,
    set_property_cmd: usize,
    io: Mutex<Option<C>>,
}

impl Player<PlayerProcess> {
    /// Launch a slave-mode player with default binding prefixes.
    pub fn launch(schema: Arc<Schema>, spec: &LaunchSpec) -> Result<Self> {
        Self::launch_with_config(schema, spec, PlayerConfig::default())
    }

    /// Launch with explicit binding configuration.
    ///
    /// Binding runs first: a prefix collision fails here, before any process
    /// is spawned.
    pub fn launch_with_config(
        schema: Arc<Schema>,
        spec: &LaunchSpec,
        config: PlayerConfig,
    ) -> Result<Self> {
        let parts = BoundParts::bind(&schema, &config)?;
        let process = PlayerProcess::launch(spec)?;
        Ok(parts.attach(schema, config, process))
    }
}

impl<C: LineIo> Player<C> {
    /// Bind the schema over an already-open channel.
    ///
    /// The launcher collaborator owns argv assembly and spawning; anything
    /// that speaks the line protocol can sit underneath. This is also the
    /// seam tests drive with in-memory streams.
    pub fn over_channel(schema: Arc<Schema>, config: PlayerConfig, channel: C) -> Result<Self> {
        let parts = BoundParts::bind(&schema, &config)?;
        Ok(parts.attach(schema, config, channel))
    }

    /// Invoke a bound command with the player's default pausing mode.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Option<String>> {
        self.invoke_with(name, args, self.config.pausing)
    }

    /// Invoke a bound command with an explicit pausing mode.
    pub fn invoke_with(
        &self,
        name: &str,
        args: &[Value],
        pausing: Pausing,
    ) -> Result<Option<String>> {
        let index = match self.bindings.get(name) {
            Some(Binding::Command(i)) => *i,
            _ => {
                return Err(PlayerError::UnknownCommand {
                    name: name.to_string(),
                })
            }
        };
        let desc = &self.schema.commands()[index];
        self.with_channel(|io| dispatch(desc, io, args, pausing))
    }

    /// Read a bound property.
    ///
    /// `None` means the property does not currently apply; a list property
    /// with no elements comes back as an empty list instead.
    pub fn get(&self, name: &str) -> Result<Option<PropertyValue>> {
        let index = match self.bindings.get(name) {
            Some(Binding::Property(i)) => *i,
            _ => {
                return Err(PlayerError::UnknownProperty {
                    name: name.to_string(),
                })
            }
        };
        let desc = &self.schema.properties()[index];
        let get_cmd = &self.schema.commands()[self.get_property_cmd];
        self.with_channel(|io| property::get(desc, get_cmd, io, self.config.pausing))
    }

    /// Write a bound property, enforcing type and declared bounds.
    pub fn set(&self, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        let index = match self.bindings.get(name) {
            Some(Binding::Property(i)) => *i,
            _ => {
                return Err(PlayerError::UnknownProperty {
                    name: name.to_string(),
                })
            }
        };
        let desc = &self.schema.properties()[index];
        let set_cmd = &self.schema.commands()[self.set_property_cmd];
        let value = value.into();
        self.with_channel(|io| property::set(desc, set_cmd, io, self.config.pausing, &value))
    }

    /// Load a file for playback. Ergonomic wrapper over `invoke`.
    pub fn load_file(&self, path: &str) -> Result<()> {
        let name = format!("{}loadfile", self.config.method_prefix);
        self.invoke(&name, &[Value::Str(path.to_string())])?;
        Ok(())
    }

    /// Ask the player to quit, then close the channel.
    pub fn quit(&self) -> Result<()> {
        let name = format!("{}quit", self.config.method_prefix);
        match self.invoke(&name, &[]) {
            Ok(_) | Err(PlayerError::Closed) => {}
            Err(err) => return Err(err),
        }
        self.close();
        Ok(())
    }

    /// Terminate the player process and release the channel. Idempotent.
    pub fn close(&self) {
        let mut guard = self.io.lock().unwrap_or_else(|p| p.into_inner());
        // Dropping the channel terminates an owned process.
        *guard = None;
    }

    pub fn is_closed(&self) -> bool {
        let guard = self.io.lock().unwrap_or_else(|p| p.into_inner());
        guard.is_none()
    }

    /// The schema this player was bound from.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Descriptor behind a bound command name, if any.
    pub fn command_descriptor(&self, name: &str) -> Option<&mplb_schema::CommandDescriptor> {
        match self.bindings.get(name) {
            Some(Binding::Command(i)) => Some(&self.schema.commands()[*i]),
            _ => None,
        }
    }

    /// Descriptor behind a bound property name, if any.
    pub fn property_descriptor(&self, name: &str) -> Option<&mplb_schema::PropertyDescriptor> {
        match self.bindings.get(name) {
            Some(Binding::Property(i)) => Some(&self.schema.properties()[*i]),
            _ => None,
        }
    }

    /// Run one protocol transaction with exclusive channel access.
    ///
    /// A disconnect observed mid-transaction closes the player: reply
    /// pairing cannot be trusted after the stream breaks.
    fn with_channel<T>(&self, f: impl FnOnce(&mut dyn LineIo) -> Result<T>) -> Result<T> {
        let mut guard = self.io.lock().unwrap_or_else(|p| p.into_inner());
        let Some(io) = guard.as_mut() else {
            return Err(PlayerError::Closed);
        };
        match f(io) {
            Err(err @ (PlayerError::Disconnected | PlayerError::Channel(_))) => {
                tracing::warn!(%err, "channel failure, closing player");
                *guard = None;
                Err(err)
            }
            other => other,
        }
    }
}

/// Binding table plus the resolved property primitives, computed before any
/// process exists.
struct BoundParts {
    bindings: HashMap<String, Binding>,
    get_property_cmd: usize,
    set_property_cmd: usize,
}

impl BoundParts {
    fn bind(schema: &Schema, config: &PlayerConfig) -> Result<Self> {
        let mut bindings = HashMap::new();
        for (i, desc) in schema.commands().iter().enumerate() {
            let bound = format!("{}{}", config.method_prefix, desc.name());
            if bindings.insert(bound.clone(), Binding::Command(i)).is_some() {
                return Err(PlayerError::PrefixCollision { name: bound });
            }
        }
        for (i, desc) in schema.properties().iter().enumerate() {
            let bound = format!("{}{}", config.property_prefix, desc.name());
            if bindings.insert(bound.clone(), Binding::Property(i)).is_some() {
                return Err(PlayerError::PrefixCollision { name: bound });
            }
        }

        let get_property_cmd = schema
            .commands()
            .iter()
            .position(|d| d.name() == "get_property")
            .ok_or(PlayerError::MissingPrimitive {
                name: "get_property",
            })?;
        let set_property_cmd = schema
            .commands()
            .iter()
            .position(|d| d.name() == "set_property")
            .ok_or(PlayerError::MissingPrimitive {
                name: "set_property",
            })?;

        Ok(Self {
            bindings,
            get_property_cmd,
            set_property_cmd,
        })
    }

    fn attach<C: LineIo>(self, schema: Arc<Schema>, config: PlayerConfig, channel: C) -> Player<C> {
        Player {
            schema,
            bindings: self.bindings,
            config,
            get_property_cmd: self.get_property_cmd,
            set_property_cmd: self.set_property_cmd,
            io: Mutex::new(Some(channel)),
        }
    }
}
