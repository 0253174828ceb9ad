//! The demo command set registered by the `herald` binary.

use std::any::Any;
use std::fmt::Write as _;
use std::sync::Arc;

use herald_command::{
    Actor, CallContext, CommandHolder, CommandMethod, CommandResult, PLAYER, ParamAttr, ParamDecl,
    SENDER,
};
use herald_foundation::TypeDesc;
use herald_parser::{FloatConstraints, IntConstraints};
use parking_lot::Mutex;

/// Where demo commands write their output.
pub type Output = Arc<dyn Fn(&str) + Send + Sync>;

/// Coordinates accepted by `tp`.
pub const WORLD_LIMIT: i64 = 30_000_000;

const USAGE: &[(&str, &str)] = &[
    ("something <float> <int,...> <float,...> <text>", "show parsed arguments"),
    ("echo <text...>", "repeat the rest of the line"),
    ("scale <0.1..10>", "set the scale factor"),
    ("whoami", "show who is running commands"),
    ("tp <x> <y> <z>", "teleport (players only)"),
    ("tag {key: int, ...}", "store tags"),
    ("help", "list commands"),
];

/// A player actor, for embedding applications and tests.
#[derive(Clone, Debug)]
pub struct DemoPlayer {
    name: String,
}

impl DemoPlayer {
    /// Creates a player with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Actor for DemoPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeDesc {
        TypeDesc::named(PLAYER)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Holder of the demo commands.
pub struct DemoCommands {
    output: Output,
    scale: Mutex<f64>,
}

impl DemoCommands {
    /// Creates the demo commands, printing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Arc::new(|line: &str| println!("{line}")))
    }

    /// Creates the demo commands with a custom output sink.
    #[must_use]
    pub fn with_output(output: Output) -> Self {
        Self {
            output,
            scale: Mutex::new(1.0),
        }
    }

    /// Returns the current scale factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        *self.scale.lock()
    }

    fn say(&self, line: &str) {
        (self.output)(line);
    }

    fn something(&self, ctx: &CallContext<'_>) -> CommandResult {
        let sender = ctx.args.actor(0).ok_or("missing sender")?;
        let value = ctx.args.float(1).ok_or("missing value")?;
        let ints = ctx.args.int_array(2).ok_or("missing ints")?;
        let floats = ctx.args.items(3).ok_or("missing floats")?;
        let text = ctx.args.str(4).ok_or("missing text")?;

        let floats: Vec<String> = floats.iter().map(ToString::to_string).collect();
        self.say(&format!(
            "{} ran {}: value={value} ints={ints:?} floats=[{}] text={text:?}",
            sender.name(),
            ctx.alias,
            floats.join(", ")
        ));
        Ok(())
    }

    fn whoami(&self, ctx: &CallContext<'_>) -> CommandResult {
        let sender = ctx.args.actor(0).ok_or("missing sender")?;
        self.say(&format!("You are {} ({})", sender.name(), sender.kind()));
        Ok(())
    }

    fn teleport(&self, ctx: &CallContext<'_>) -> CommandResult {
        let player = ctx.args.actor(0).ok_or("missing player")?;
        let (x, y, z) = (
            ctx.args.int(1).ok_or("missing x")?,
            ctx.args.int(2).ok_or("missing y")?,
            ctx.args.int(3).ok_or("missing z")?,
        );
        self.say(&format!("Teleported {} to {x}, {y}, {z}", player.name()));
        Ok(())
    }

    fn tag(&self, ctx: &CallContext<'_>) -> CommandResult {
        let tags = ctx.args.map(0).ok_or("missing tags")?;
        let mut entries: Vec<String> = tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        entries.sort();
        self.say(&format!("Tagged {} entries: {}", entries.len(), entries.join(" ")));
        Ok(())
    }

    fn help(&self, ctx: &CallContext<'_>) -> CommandResult {
        let label = ctx.args.str(0).unwrap_or("help");
        let mut text = format!("Commands ({label}):");
        for (usage, about) in USAGE {
            let _ = write!(text, "\n  {usage:<48} {about}");
        }
        self.say(&text);
        Ok(())
    }
}

impl Default for DemoCommands {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHolder for DemoCommands {
    fn holder_name(&self) -> &str {
        "DemoCommands"
    }

    fn methods(&self) -> Vec<CommandMethod<Self>> {
        let sender = || ParamDecl::actor("sender", TypeDesc::named(SENDER));
        let coordinate = |name: &'static str| {
            ParamDecl::new(name, TypeDesc::Int).with_attr(ParamAttr::IntArg(
                IntConstraints::new().with_range(-WORLD_LIMIT, WORLD_LIMIT),
            ))
        };

        vec![
            CommandMethod::new("something")
                .command()
                .alias("sm")
                .param(sender())
                .param(ParamDecl::new("value", TypeDesc::Float))
                .param(ParamDecl::new("ints", TypeDesc::array(TypeDesc::Int)))
                .param(ParamDecl::new("floats", TypeDesc::collection(TypeDesc::Float)))
                .param(ParamDecl::new("text", TypeDesc::Str))
                .bound(Self::something),
            CommandMethod::new("echo")
                .command()
                .alias("say")
                .param(ParamDecl::new("text", TypeDesc::Str).with_attr(ParamAttr::Greedy))
                .bound(|this: &Self, ctx| {
                    this.say(ctx.args.str(0).unwrap_or_default());
                    Ok(())
                }),
            CommandMethod::new("scale")
                .command()
                .param(ParamDecl::new("factor", TypeDesc::Float).with_attr(ParamAttr::FloatArg(
                    FloatConstraints::new().with_range(0.1, 10.0),
                )))
                .bound(|this: &Self, ctx| {
                    let factor = ctx.args.float(0).ok_or("missing factor")?;
                    *this.scale.lock() = factor;
                    this.say(&format!("Scale set to {factor}"));
                    Ok(())
                }),
            CommandMethod::new("whoami")
                .command()
                .param(sender())
                .bound(Self::whoami),
            CommandMethod::new("teleport")
                .named("tp")
                .alias("teleport")
                .param(ParamDecl::actor("player", TypeDesc::named(PLAYER)))
                .param(coordinate("x"))
                .param(coordinate("y"))
                .param(coordinate("z"))
                .bound(Self::teleport),
            CommandMethod::new("tag")
                .command()
                .param(ParamDecl::new(
                    "tags",
                    TypeDesc::map(TypeDesc::Str, TypeDesc::Int),
                ))
                .bound(Self::tag),
            CommandMethod::new("help")
                .command()
                .alias("?")
                .param(ParamDecl::new("label", TypeDesc::Str).with_attr(ParamAttr::Alias))
                .bound(Self::help),
        ]
    }
}
