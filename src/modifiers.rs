//! Compiled event request modifiers and the context they are checked
//! against.

use regex::Regex;

use crate::{
    spec::{event_request::Modifier, *},
    vm::ClassInfo,
};

/// A class name pattern as used by the ClassMatch, ClassExclude and
/// SourceNameMatch modifiers, compiled once when the request is set.
///
/// `*` matches any run of characters and everything else is literal, so
/// `java.*` matches `java.lang.String` but not `javax.Foo`.
#[derive(Debug, Clone)]
pub struct ClassPattern {
    pattern: String,
    regex: Regex,
}

impl ClassPattern {
    pub fn new(pattern: &str) -> Result<ClassPattern, regex::Error> {
        let body = regex::escape(pattern).replace(r"\*", ".*");
        Ok(ClassPattern {
            pattern: pattern.to_owned(),
            regex: Regex::new(&format!("^(?:{body})$"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// A [Modifier] ready for evaluation.
#[derive(Debug, Clone)]
pub enum EventModifier {
    Count(i32),
    Conditional,
    ThreadOnly(ThreadID),
    ClassOnly(ReferenceTypeID),
    ClassMatch(ClassPattern),
    ClassExclude(ClassPattern),
    LocationOnly(Location),
    ExceptionOnly {
        exception: Option<ReferenceTypeID>,
        caught: bool,
        uncaught: bool,
    },
    FieldOnly(ReferenceTypeID, FieldID),
    Step {
        thread: ThreadID,
        size: StepSize,
        depth: StepDepth,
    },
    InstanceOnly(ObjectID),
    SourceNameMatch(ClassPattern),
}

fn pattern(pattern: &str) -> Result<ClassPattern, ErrorCode> {
    ClassPattern::new(pattern).map_err(|_| ErrorCode::IllegalArgument)
}

impl TryFrom<Modifier> for EventModifier {
    type Error = ErrorCode;

    fn try_from(modifier: Modifier) -> Result<Self, Self::Error> {
        Ok(match modifier {
            Modifier::Count(count) if count <= 0 => return Err(ErrorCode::InvalidCount),
            Modifier::Count(count) => EventModifier::Count(count),
            Modifier::Conditional { .. } => EventModifier::Conditional,
            Modifier::ThreadOnly(thread) => EventModifier::ThreadOnly(thread),
            Modifier::ClassOnly(class) => EventModifier::ClassOnly(class),
            Modifier::ClassMatch(p) => EventModifier::ClassMatch(pattern(&p)?),
            Modifier::ClassExclude(p) => EventModifier::ClassExclude(pattern(&p)?),
            Modifier::LocationOnly(location) => EventModifier::LocationOnly(location),
            Modifier::ExceptionOnly {
                exception,
                caught,
                uncaught,
            } => EventModifier::ExceptionOnly {
                exception,
                caught,
                uncaught,
            },
            Modifier::FieldOnly(class, field) => EventModifier::FieldOnly(class, field),
            Modifier::Step(thread, size, depth) => EventModifier::Step {
                thread,
                size,
                depth,
            },
            Modifier::InstanceOnly(object) => EventModifier::InstanceOnly(object),
            Modifier::SourceNameMatch(p) => EventModifier::SourceNameMatch(pattern(&p)?),
        })
    }
}

/// What is known about an event at the point it occurs.
///
/// A modifier whose subject is missing from the context doesn't apply to the
/// event and passes.
#[derive(Debug, Clone, Default)]
pub struct EventContext<'a> {
    pub thread: Option<ThreadID>,
    pub class_id: Option<ReferenceTypeID>,
    /// Dotted class name
    pub class_name: Option<String>,
    pub source_name: Option<&'a str>,
    pub location: Option<Location>,
    /// The frame's `this`, with `Some(None)` for static frames.
    pub this: Option<Option<ObjectID>>,
    /// Type of the thrown exception followed by its superclasses, and
    /// whether it is caught.
    pub exception: Option<(Vec<ReferenceTypeID>, bool)>,
    pub field: Option<(ReferenceTypeID, FieldID)>,
}

impl<'a> EventContext<'a> {
    pub fn new(thread: ThreadID) -> Self {
        EventContext {
            thread: Some(thread),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &'a ClassInfo) -> Self {
        self.class_id = Some(*class.id);
        self.class_name = Some(class.name());
        self.source_name = class.source_file.as_deref();
        self
    }

    pub fn with_class_name(mut self, name: String) -> Self {
        self.class_name = Some(name);
        self
    }

    /// Also takes the class from the location unless one is already set.
    pub fn at(mut self, location: Location) -> Self {
        self.class_id.get_or_insert(*location.reference_id);
        self.location = Some(location);
        self
    }

    pub fn with_this(mut self, this: Option<ObjectID>) -> Self {
        self.this = Some(this);
        self
    }

    pub fn with_exception(mut self, types: Vec<ReferenceTypeID>, caught: bool) -> Self {
        self.exception = Some((types, caught));
        self
    }
}

impl EventModifier {
    /// Count is handled by the owning request and always passes here.
    pub fn matches(&self, ctx: &EventContext<'_>) -> bool {
        use EventModifier::*;

        match self {
            Count(_) | Conditional => true,
            ThreadOnly(thread) | Step { thread, .. } => ctx.thread.map_or(true, |t| t == *thread),
            ClassOnly(class) => ctx.class_id.map_or(true, |c| c == *class),
            ClassMatch(p) => ctx.class_name.as_deref().map_or(true, |n| p.is_match(n)),
            ClassExclude(p) => ctx.class_name.as_deref().map_or(true, |n| !p.is_match(n)),
            LocationOnly(required) => ctx.location.map_or(true, |l| {
                *l.reference_id == *required.reference_id
                    && l.method_id == required.method_id
                    && l.index == required.index
            }),
            ExceptionOnly {
                exception,
                caught,
                uncaught,
            } => ctx.exception.as_ref().map_or(true, |(thrown, is_caught)| {
                let type_ok = exception.map_or(true, |e| thrown.contains(&e));
                type_ok && if *is_caught { *caught } else { *uncaught }
            }),
            FieldOnly(class, field) => ctx.field.map_or(true, |f| f == (*class, *field)),
            InstanceOnly(object) => ctx.this.map_or(true, |this| this == Some(*object)),
            SourceNameMatch(p) => ctx.source_name.map_or(true, |n| p.is_match(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(modifier: Modifier) -> EventModifier {
        EventModifier::try_from(modifier).unwrap()
    }

    fn location(class: u64, method: u64, index: u64) -> Location {
        Location::new(
            TaggedReferenceTypeID::Class(JdwpId::from_raw(class)),
            MethodID::from_raw(method),
            index,
        )
    }

    #[test]
    fn glob_patterns() {
        let prefix = ClassPattern::new("java.*").unwrap();
        assert!(prefix.is_match("java.lang.String"));
        assert!(!prefix.is_match("javax.swing.JFrame"));

        let suffix = ClassPattern::new("*.Foo").unwrap();
        assert!(suffix.is_match("com.example.Foo"));
        assert!(!suffix.is_match("com.example.FooBar"));

        let exact = ClassPattern::new("Outer$Inner").unwrap();
        assert!(exact.is_match("Outer$Inner"));
        assert!(!exact.is_match("Outer"));
        assert_eq!(exact.as_str(), "Outer$Inner");
    }

    #[test]
    fn class_filters_use_the_context_name() {
        let ctx = EventContext::new(ThreadID::from_raw(1)).with_class_name("java.util.List".into());
        assert!(compile(Modifier::ClassMatch("java.util.*".into())).matches(&ctx));
        assert!(!compile(Modifier::ClassExclude("java.*".into())).matches(&ctx));
    }

    #[test]
    fn location_only_needs_the_exact_index() {
        let modifier = compile(Modifier::LocationOnly(location(1, 2, 5)));
        let thread = ThreadID::from_raw(1);
        assert!(modifier.matches(&EventContext::new(thread).at(location(1, 2, 5))));
        assert!(!modifier.matches(&EventContext::new(thread).at(location(1, 2, 4))));
        assert!(!modifier.matches(&EventContext::new(thread).at(location(1, 3, 5))));
    }

    #[test]
    fn thread_filters() {
        let thread = ThreadID::from_raw(7);
        let ctx = EventContext::new(ThreadID::from_raw(8));
        assert!(!compile(Modifier::ThreadOnly(thread)).matches(&ctx));
        assert!(!compile(Modifier::Step(thread, StepSize::Line, StepDepth::Over)).matches(&ctx));
        assert!(compile(Modifier::ThreadOnly(thread)).matches(&EventContext::new(thread)));
    }

    #[test]
    fn exception_filters() {
        let npe = ReferenceTypeID::from_raw(30);
        let ctx = EventContext::new(ThreadID::from_raw(1));

        let uncaught_npe = compile(Modifier::ExceptionOnly {
            exception: Some(npe),
            caught: false,
            uncaught: true,
        });
        assert!(uncaught_npe.matches(&ctx.clone().with_exception(vec![npe], false)));
        assert!(!uncaught_npe.matches(&ctx.clone().with_exception(vec![npe], true)));
        assert!(!uncaught_npe.matches(&ctx.clone().with_exception(vec![], false)));

        let any = compile(Modifier::ExceptionOnly {
            exception: None,
            caught: true,
            uncaught: true,
        });
        assert!(any.matches(&ctx.with_exception(vec![ReferenceTypeID::from_raw(31)], true)));
    }

    #[test]
    fn exception_filters_match_subclasses() {
        let (runtime, state, throwable) = (
            ReferenceTypeID::from_raw(30),
            ReferenceTypeID::from_raw(31),
            ReferenceTypeID::from_raw(32),
        );
        let ctx = EventContext::new(ThreadID::from_raw(1));
        let runtime_only = compile(Modifier::ExceptionOnly {
            exception: Some(runtime),
            caught: true,
            uncaught: true,
        });

        let state_ctx = ctx.clone().with_exception(vec![state, runtime, throwable], true);
        assert!(runtime_only.matches(&state_ctx));
        assert!(runtime_only.matches(&ctx.clone().with_exception(vec![runtime, throwable], false)));
        // a superclass of the filter is not an instance of it
        assert!(!runtime_only.matches(&ctx.with_exception(vec![throwable], true)));
    }

    #[test]
    fn instance_only_rejects_static_frames() {
        let object = ObjectID::from_raw(44);
        let modifier = compile(Modifier::InstanceOnly(object));
        let ctx = EventContext::new(ThreadID::from_raw(1));
        assert!(modifier.matches(&ctx.clone().with_this(Some(object))));
        assert!(!modifier.matches(&ctx.clone().with_this(None)));
        assert!(modifier.matches(&ctx));
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        assert_eq!(
            EventModifier::try_from(Modifier::Count(0)).unwrap_err(),
            ErrorCode::InvalidCount
        );
    }
}
