#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    io::{ErrorKind, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    rc::Rc,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use jdwp_server::{
    codec::{JdwpReadable, JdwpReader, JdwpWritable},
    config::ServerConfig,
    jvm::{FieldModifiers, MethodModifiers, TypeModifiers},
    server::JdwpServer,
    spec::{
        event::{Composite, Event},
        *,
    },
    thread::DebugThread,
    vm::*,
};
use lazy_static::lazy_static;

pub const MAIN: u64 = 1;
pub const WORKER: u64 = 2;
pub const GROUP: u64 = 10;

pub const CLASS: u64 = 100;
pub const EXCEPTION_CLASS: u64 = 101;
pub const RUNTIME_EXCEPTION_CLASS: u64 = 102;
pub const OBJECT_CLASS: u64 = 99;

/// `Main.main`, with source lines.
pub const M: u64 = 1;
/// `Main.check`, with source lines, returns a boolean.
pub const N: u64 = 2;
/// `Main.generated`, without source lines.
pub const O: u64 = 3;

pub const COUNT_FIELD: u64 = 1;
pub const TOTAL_FIELD: u64 = 2;

pub const OBJECT: u64 = 300;
pub const EXCEPTION: u64 = 301;
pub const STRING: u64 = 500;
pub const ARRAY: u64 = 600;

pub fn thread_id(raw: u64) -> ThreadID {
    ThreadID::from_raw(raw)
}

pub fn class_id() -> ReferenceTypeID {
    ReferenceTypeID::from_raw(CLASS)
}

pub fn location(method: u64, index: u64) -> Location {
    Location::new(
        TaggedReferenceTypeID::Class(ClassID::from_raw(CLASS)),
        MethodID::from_raw(method),
        index,
    )
}

fn method(id: u64, name: &str, signature: &str, modifiers: MethodModifiers) -> MethodInfo {
    MethodInfo {
        id: MethodID::from_raw(id),
        name: name.to_owned(),
        signature: signature.to_owned(),
        generic_signature: None,
        modifiers,
    }
}

lazy_static! {
    pub static ref MAIN_CLASS: Arc<ClassInfo> = Arc::new(ClassInfo {
        id: TaggedReferenceTypeID::Class(ClassID::from_raw(CLASS)),
        signature: "LMain;".to_owned(),
        generic_signature: None,
        status: ClassStatus::OK,
        modifiers: TypeModifiers::PUBLIC | TypeModifiers::SUPER,
        class_loader: None,
        superclass: Some(ClassID::from_raw(OBJECT_CLASS)),
        interfaces: vec![],
        source_file: Some("Main.java".to_owned()),
        fields: vec![
            FieldInfo {
                id: FieldID::from_raw(COUNT_FIELD),
                name: "count".to_owned(),
                signature: "I".to_owned(),
                generic_signature: None,
                modifiers: FieldModifiers::PRIVATE,
            },
            FieldInfo {
                id: FieldID::from_raw(TOTAL_FIELD),
                name: "names".to_owned(),
                signature: "Ljava/util/List;".to_owned(),
                generic_signature: Some("Ljava/util/List<Ljava/lang/String;>;".to_owned()),
                modifiers: FieldModifiers::STATIC | FieldModifiers::FINAL,
            },
        ],
        methods: vec![
            method(M, "main", "()V", MethodModifiers::PUBLIC),
            method(N, "check", "()Z", MethodModifiers::STATIC),
            method(O, "generated", "()I", MethodModifiers::SYNTHETIC),
        ],
    });
    pub static ref EXCEPTION_CLASS_INFO: Arc<ClassInfo> = Arc::new(ClassInfo {
        id: TaggedReferenceTypeID::Class(ClassID::from_raw(EXCEPTION_CLASS)),
        signature: "Ljava/lang/IllegalStateException;".to_owned(),
        generic_signature: None,
        status: ClassStatus::OK,
        modifiers: TypeModifiers::PUBLIC,
        class_loader: None,
        superclass: Some(ClassID::from_raw(RUNTIME_EXCEPTION_CLASS)),
        interfaces: vec![],
        source_file: None,
        fields: vec![],
        methods: vec![],
    });
    pub static ref RUNTIME_EXCEPTION_CLASS_INFO: Arc<ClassInfo> = Arc::new(ClassInfo {
        id: TaggedReferenceTypeID::Class(ClassID::from_raw(RUNTIME_EXCEPTION_CLASS)),
        signature: "Ljava/lang/RuntimeException;".to_owned(),
        generic_signature: None,
        status: ClassStatus::OK,
        modifiers: TypeModifiers::PUBLIC,
        class_loader: None,
        superclass: Some(ClassID::from_raw(OBJECT_CLASS)),
        interfaces: vec![],
        source_file: None,
        fields: vec![],
        methods: vec![],
    });
    static ref M_LINES: Arc<LineTable> = Arc::new(LineTable {
        start: 0,
        end: 6,
        lines: vec![(0, 9), (2, 10), (5, 11)],
    });
    static ref N_LINES: Arc<LineTable> = Arc::new(LineTable {
        start: 0,
        end: 1,
        lines: vec![(0, 20), (1, 21)],
    });
}

#[derive(Debug)]
struct MockFrame {
    info: FrameInfo,
    this: Option<ObjectID>,
    locals: HashMap<i32, Value>,
}

/// A debuggee whose threads only move when a test's interpreter script
/// moves them.
#[derive(Debug)]
pub struct MockVm {
    threads: Vec<(ThreadID, &'static str)>,
    suspend_counts: HashMap<ThreadID, AtomicI32>,
    frames: Mutex<HashMap<ThreadID, Vec<MockFrame>>>,
    strings: Mutex<HashMap<ObjectID, String>>,
}

impl MockVm {
    pub fn new() -> MockVm {
        let threads = vec![(thread_id(MAIN), "main"), (thread_id(WORKER), "worker")];
        let suspend_counts = threads
            .iter()
            .map(|&(id, _)| (id, AtomicI32::new(0)))
            .collect();
        let strings = [(ObjectID::from_raw(STRING), "hello".to_owned())].into();
        MockVm {
            threads,
            suspend_counts,
            frames: Mutex::default(),
            strings: Mutex::new(strings),
        }
    }

    fn counter(&self, id: ThreadID) -> Result<&AtomicI32, ErrorCode> {
        self.suspend_counts.get(&id).ok_or(ErrorCode::InvalidThread)
    }

    pub fn push_frame(&self, thread: ThreadID, location: Location, this: Option<ObjectID>) {
        let mut frames = self.frames.lock().unwrap();
        let stack = frames.entry(thread).or_default();
        let id = FrameID::from_raw(thread.raw() * 1000 + stack.len() as u64 + 1);
        stack.push(MockFrame {
            info: FrameInfo { id, location },
            this,
            locals: HashMap::new(),
        });
    }

    /// Moves the top frame of `thread` and returns its new location.
    pub fn move_top(&self, thread: ThreadID, index: u64) -> Location {
        let mut frames = self.frames.lock().unwrap();
        let top = frames
            .get_mut(&thread)
            .and_then(|s| s.last_mut())
            .expect("no frame to execute in");
        top.info.location = top.info.location.at(index);
        top.info.location
    }

    /// Overrides the suspend count the way a buggy or racing interpreter
    /// could leave it.
    pub fn force_suspend_count(&self, thread: ThreadID, count: i32) {
        self.suspend_counts[&thread].store(count, Ordering::SeqCst);
    }

    /// Pops the top frame without moving the caller.
    pub fn discard_frame(&self, thread: ThreadID) {
        if let Some(stack) = self.frames.lock().unwrap().get_mut(&thread) {
            stack.pop();
        }
    }

    /// Pops the top frame and moves the caller past its call instruction.
    pub fn pop_frame(&self, thread: ThreadID) -> Option<Location> {
        let mut frames = self.frames.lock().unwrap();
        let stack = frames.get_mut(&thread)?;
        stack.pop();
        let caller = stack.last_mut()?;
        caller.info.location = caller.info.location.at(caller.info.location.index + 1);
        Some(caller.info.location)
    }

    fn with_frame<T>(
        &self,
        thread: ThreadID,
        frame: FrameID,
        f: impl FnOnce(&mut MockFrame) -> Result<T, ErrorCode>,
    ) -> Result<T, ErrorCode> {
        self.counter(thread)?;
        let mut frames = self.frames.lock().unwrap();
        let frame = frames
            .get_mut(&thread)
            .and_then(|s| s.iter_mut().find(|f| f.info.id == frame))
            .ok_or(ErrorCode::InvalidFrameid)?;
        f(frame)
    }
}

impl Debuggee for MockVm {
    fn version(&self) -> VersionInfo {
        VersionInfo {
            description: "Mock VM for tests".to_owned(),
            version_major: 1,
            version_minor: 8,
            vm_version: "0.1.0".to_owned(),
            vm_name: "mock".to_owned(),
        }
    }

    fn classes(&self) -> Vec<Arc<ClassInfo>> {
        vec![
            MAIN_CLASS.clone(),
            EXCEPTION_CLASS_INFO.clone(),
            RUNTIME_EXCEPTION_CLASS_INFO.clone(),
        ]
    }

    fn class(&self, id: ReferenceTypeID) -> Option<Arc<ClassInfo>> {
        self.classes().into_iter().find(|c| *c.id == id)
    }

    fn create_string(&self, value: &str) -> Result<StringID, ErrorCode> {
        let mut strings = self.strings.lock().unwrap();
        let id = StringID::from_raw(STRING + strings.len() as u64);
        strings.insert(*id, value.to_owned());
        Ok(id)
    }

    fn threads(&self) -> Vec<ThreadID> {
        self.threads.iter().map(|&(id, _)| id).collect()
    }

    fn thread(&self, id: ThreadID) -> Option<ThreadInfo> {
        let &(_, name) = self.threads.iter().find(|(t, _)| *t == id)?;
        Some(ThreadInfo {
            name: name.to_owned(),
            group: ThreadGroupID::from_raw(GROUP),
            status: if id == thread_id(MAIN) {
                ThreadStatus::Running
            } else {
                ThreadStatus::Wait
            },
        })
    }

    fn top_level_thread_groups(&self) -> Vec<ThreadGroupID> {
        vec![ThreadGroupID::from_raw(GROUP)]
    }

    fn thread_group(&self, id: ThreadGroupID) -> Option<ThreadGroupInfo> {
        (id.raw() == GROUP).then(|| ThreadGroupInfo {
            name: "main".to_owned(),
            parent: None,
            threads: self.threads(),
            groups: vec![],
        })
    }

    fn suspend_thread(&self, id: ThreadID) -> Result<(), ErrorCode> {
        self.counter(id)?.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn resume_thread(&self, id: ThreadID) -> Result<(), ErrorCode> {
        let _ = self
            .counter(id)?
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                (c > 0).then_some(c - 1)
            });
        Ok(())
    }

    fn suspend_count(&self, id: ThreadID) -> Result<i32, ErrorCode> {
        Ok(self.counter(id)?.load(Ordering::SeqCst))
    }

    fn frames(&self, thread: ThreadID) -> Result<Vec<FrameInfo>, ErrorCode> {
        self.counter(thread)?;
        let frames = self.frames.lock().unwrap();
        Ok(frames
            .get(&thread)
            .map(|s| s.iter().rev().map(|f| f.info).collect())
            .unwrap_or_default())
    }

    fn frame_values(
        &self,
        thread: ThreadID,
        frame: FrameID,
        slots: &[(i32, Tag)],
    ) -> Result<Vec<Value>, ErrorCode> {
        self.with_frame(thread, frame, |frame| {
            slots
                .iter()
                .map(|&(slot, tag)| {
                    frame
                        .locals
                        .get(&slot)
                        .map(|v| v.coerce_to(tag))
                        .ok_or(ErrorCode::InvalidSlot)
                })
                .collect()
        })
    }

    fn set_frame_values(
        &self,
        thread: ThreadID,
        frame: FrameID,
        values: &[(i32, Value)],
    ) -> Result<(), ErrorCode> {
        self.with_frame(thread, frame, |frame| {
            frame.locals.extend(values.iter().copied());
            Ok(())
        })
    }

    fn this_object(
        &self,
        thread: ThreadID,
        frame: FrameID,
    ) -> Result<Option<TaggedObjectID>, ErrorCode> {
        self.with_frame(thread, frame, |frame| Ok(frame.this.map(TaggedObjectID::Object)))
    }

    fn object_type(&self, object: ObjectID) -> Result<TaggedReferenceTypeID, ErrorCode> {
        match object.raw() {
            OBJECT => Ok(MAIN_CLASS.id),
            EXCEPTION => Ok(EXCEPTION_CLASS_INFO.id),
            _ => Err(ErrorCode::InvalidObject),
        }
    }

    fn instance_field_values(
        &self,
        object: ObjectID,
        fields: &[FieldID],
    ) -> Result<Vec<Value>, ErrorCode> {
        if object.raw() != OBJECT {
            return Err(ErrorCode::InvalidObject);
        }
        fields
            .iter()
            .map(|f| match f.raw() {
                COUNT_FIELD => Ok(Value::Int(42)),
                _ => Err(ErrorCode::InvalidFieldid),
            })
            .collect()
    }

    fn static_field_values(
        &self,
        _class: ReferenceTypeID,
        fields: &[FieldID],
    ) -> Result<Vec<Value>, ErrorCode> {
        Ok(fields
            .iter()
            .map(|_| Value::Object(ObjectID::from_raw(0)))
            .collect())
    }

    fn is_collected(&self, object: ObjectID) -> Result<bool, ErrorCode> {
        match object.raw() {
            OBJECT | EXCEPTION | ARRAY => Ok(false),
            _ => Err(ErrorCode::InvalidObject),
        }
    }

    fn string_value(&self, object: ObjectID) -> Result<String, ErrorCode> {
        self.strings
            .lock()
            .unwrap()
            .get(&object)
            .cloned()
            .ok_or(ErrorCode::InvalidObject)
    }

    fn array_length(&self, array: ArrayID) -> Result<i32, ErrorCode> {
        match array.raw() {
            ARRAY => Ok(3),
            _ => Err(ErrorCode::InvalidArray),
        }
    }

    fn array_region(
        &self,
        _array: ArrayID,
        first: usize,
        length: usize,
    ) -> Result<ArrayRegion, ErrorCode> {
        Ok(ArrayRegion::Int([7, 8, 9][first..first + length].to_vec()))
    }

    /// Runs `check` on the interpreter that is servicing the command, the
    /// only thread able to execute code here.
    fn invoke_method(
        &self,
        object: ObjectID,
        thread: ThreadID,
        _class: ClassID,
        method: MethodID,
        _arguments: &[Value],
        _options: InvokeOptions,
    ) -> Result<InvokeMethodReply, ErrorCode> {
        let interpreter = RUNNING
            .with(|running| running.borrow().clone())
            .filter(|interpreter| interpreter.thread.id() == thread)
            .ok_or(ErrorCode::NotImplemented)?;
        if method.raw() != N {
            return Err(ErrorCode::InvalidMethodid);
        }
        let this = (object.raw() != 0).then_some(object.raw());
        Ok(InvokeMethodReply {
            return_value: interpreter.invoke(method.raw(), this),
            exception: TaggedObjectID::NULL,
        })
    }
}

impl SourceInfo for MockVm {
    fn line_table(&self, class: ReferenceTypeID, method: MethodID) -> Option<Arc<LineTable>> {
        if class.raw() != CLASS {
            return None;
        }
        match method.raw() {
            M => Some(M_LINES.clone()),
            N => Some(N_LINES.clone()),
            _ => None,
        }
    }

    fn variable_table(&self, class: ReferenceTypeID, method: MethodID) -> Option<VariableTable> {
        (class.raw() == CLASS && method.raw() == M).then(|| VariableTable {
            arg_count: 1,
            variables: vec![LocalVariable {
                code_index: 0,
                name: "this".to_owned(),
                signature: "LMain;".to_owned(),
                generic_signature: None,
                length: 7,
                slot: 0,
            }],
        })
    }
}

thread_local! {
    /// The interpreter running on this thread, for invocations it services.
    static RUNNING: RefCell<Option<Rc<Interpreter>>> = RefCell::new(None);
}

/// Drives the hooks of one interpreter thread the way an interpreter
/// would, keeping the mock's frames in sync.
pub struct Interpreter {
    pub thread: DebugThread,
    vm: Arc<MockVm>,
}

impl Interpreter {
    /// Enters `method` at index 0, without executing anything yet.
    pub fn call(&self, method: u64, this: Option<u64>) {
        let this = this.map(ObjectID::from_raw);
        let location = location(method, 0);
        self.vm.push_frame(self.thread.id(), location, this);
        self.thread.frame_entered(location, this);
    }

    pub fn exec(&self, index: u64) {
        let location = self.vm.move_top(self.thread.id(), index);
        self.thread.instruction(location);
    }

    pub fn run(&self, indices: impl IntoIterator<Item = u64>) {
        for index in indices {
            self.exec(index);
        }
    }

    pub fn ret(&self, value: Option<Value>) {
        self.thread.frame_exited(value);
        if let Some(caller) = self.vm.pop_frame(self.thread.id()) {
            self.thread.returned_to(caller);
        }
    }

    /// Runs `check` to its end in a frame of its own on top of whatever this
    /// thread is stopped in, leaving the caller where it was.
    pub fn invoke(&self, method: u64, this: Option<u64>) -> Value {
        let value = Value::Boolean(true);
        self.call(method, this);
        self.run(0..2);
        self.thread.frame_exited(Some(value));
        self.vm.discard_frame(self.thread.id());
        value
    }
}

pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

/// Starts a server, runs `script` on an interpreter thread once a debugger
/// attached, and connects a client to it.
///
/// The interpreter thread announces itself with VM_START (suspending
/// everything) before the script runs, and sends VM_DEATH after it.
pub fn attach(script: impl FnOnce(&Interpreter) + Send + 'static) -> TestClient {
    attach_with(ServerConfig::default(), script)
}

pub fn attach_with(
    config: ServerConfig,
    script: impl FnOnce(&Interpreter) + Send + 'static,
) -> TestClient {
    init_logger();

    let vm = Arc::new(MockVm::new());
    let config = config.with_poll_interval(Duration::from_millis(10));
    let server = JdwpServer::bind("127.0.0.1:0", config).unwrap();
    let addr = server.local_addr().unwrap();

    let interpreter_vm = vm.clone();
    let interpreter = thread::spawn(move || {
        let session = server
            .accept(interpreter_vm.clone(), interpreter_vm.clone())
            .unwrap();
        let interpreter = Rc::new(Interpreter {
            thread: DebugThread::new(session.clone(), thread_id(MAIN)),
            vm: interpreter_vm,
        });
        RUNNING.with(|running| running.replace(Some(interpreter.clone())));
        session.start(thread_id(MAIN));
        script(&interpreter);
        session.vm_died();
        RUNNING.with(|running| running.take());
    });

    TestClient::connect(addr, vm, interpreter)
}

/// A minimal debugger.
pub struct TestClient {
    stream: TcpStream,
    next_id: u32,
    events: VecDeque<Composite>,
    vm: Arc<MockVm>,
    interpreter: Option<JoinHandle<()>>,
}

impl TestClient {
    fn connect(addr: SocketAddr, vm: Arc<MockVm>, interpreter: JoinHandle<()>) -> TestClient {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(HANDSHAKE).unwrap();
        let mut handshake = [0; 14];
        stream.read_exact(&mut handshake).unwrap();
        assert_eq!(&handshake, HANDSHAKE);

        TestClient {
            stream,
            next_id: 1,
            events: VecDeque::new(),
            vm,
            interpreter: Some(interpreter),
        }
    }

    pub fn vm(&self) -> &MockVm {
        &self.vm
    }

    /// The next whole packet, `None` once the server closed the connection.
    fn read_packet(&mut self) -> Option<Vec<u8>> {
        let mut length = [0; 4];
        match self.stream.read_exact(&mut length) {
            Ok(()) => {}
            Err(e) if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset) => {
                return None
            }
            Err(e) => panic!("reading from the server: {}", e),
        }
        let mut packet = vec![0; u32::from_be_bytes(length) as usize];
        packet[..4].copy_from_slice(&length);
        self.stream.read_exact(&mut packet[4..]).unwrap();
        Some(packet)
    }

    /// Reads until the reply to `id`, queueing the events in between.
    fn reply_to(&mut self, id: u32) -> Vec<u8> {
        loop {
            let packet = self
                .read_packet()
                .unwrap_or_else(|| panic!("connection closed before the reply to {}", id));
            let mut reader = JdwpReader::new(&packet);
            let header = PacketHeader::read(&mut reader).unwrap();
            match header.meta() {
                PacketMeta::Reply(_) if header.id() == id => return packet,
                PacketMeta::Reply(code) => panic!("unexpected reply {} ({})", header.id(), code),
                PacketMeta::Command(command) => {
                    assert_eq!(command, Composite::ID);
                    self.events.push_back(Composite::read(&mut reader).unwrap());
                }
            }
        }
    }

    fn write_command<C: JdwpWritable>(&mut self, command: CommandId, body: &C) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let packet = encode_packet(id, PacketMeta::Command(command), body).unwrap();
        self.stream.write_all(&packet).unwrap();
        id
    }

    pub fn send<C>(&mut self, command: C) -> Result<C::Reply, ErrorCode>
    where
        C: Command + JdwpWritable,
        C::Reply: JdwpReadable,
    {
        let id = self.write_command(C::ID, &command);
        let packet = self.reply_to(id);
        let mut reader = JdwpReader::new(&packet);
        match PacketHeader::read(&mut reader).unwrap().meta() {
            PacketMeta::Reply(ErrorCode::None) => {
                let reply = C::Reply::read(&mut reader).unwrap();
                assert!(
                    reader.is_empty(),
                    "{} bytes left after the reply to {}",
                    reader.remaining(),
                    C::ID
                );
                Ok(reply)
            }
            PacketMeta::Reply(code) => Err(code),
            PacketMeta::Command(_) => unreachable!(),
        }
    }

    /// Sends a command packet with an arbitrary id pair and body, returning
    /// the reply's error code and body.
    pub fn send_raw(&mut self, command_set: u8, command: u8, body: &[u8]) -> (ErrorCode, Vec<u8>) {
        let id = self.next_id;
        self.next_id += 1;
        let mut packet = Vec::new();
        packet.extend_from_slice(&((11 + body.len()) as u32).to_be_bytes());
        packet.extend_from_slice(&id.to_be_bytes());
        packet.extend_from_slice(&[0, command_set, command]);
        packet.extend_from_slice(body);
        self.stream.write_all(&packet).unwrap();

        let reply = self.reply_to(id);
        match PacketHeader::read(&mut JdwpReader::new(&reply)).unwrap().meta() {
            PacketMeta::Reply(code) => (code, reply[11..].to_vec()),
            PacketMeta::Command(_) => unreachable!(),
        }
    }

    /// Writes bytes as they are, for packets that get no reply.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).unwrap();
    }

    pub fn recv_event(&mut self) -> Composite {
        if let Some(composite) = self.events.pop_front() {
            return composite;
        }
        let packet = self
            .read_packet()
            .expect("connection closed while waiting for an event");
        let mut reader = JdwpReader::new(&packet);
        let header = PacketHeader::read(&mut reader).unwrap();
        assert_eq!(header.meta(), PacketMeta::Command(Composite::ID));
        Composite::read(&mut reader).unwrap()
    }

    /// Waits for the VM_START every session begins with.
    pub fn started(mut self) -> TestClient {
        let composite = self.recv_event();
        assert_eq!(composite.suspend_policy, SuspendPolicy::All);
        assert_eq!(
            composite.events,
            [Event::VmStart(RequestID::AUTOMATIC, thread_id(MAIN))]
        );
        self
    }

    pub fn is_closed(&mut self) -> bool {
        self.events.is_empty() && self.read_packet().is_none()
    }

    /// Waits for the script to end, which must be reported as VM_DEATH.
    pub fn finish(mut self) -> Arc<MockVm> {
        let composite = self.recv_event();
        assert_eq!(composite.suspend_policy, SuspendPolicy::None);
        assert_eq!(composite.events, [Event::VmDeath(RequestID::AUTOMATIC)]);
        assert!(self.is_closed());
        self.join()
    }

    /// Closes the connection and waits for the interpreter thread to notice
    /// and run to its end.
    pub fn hang_up(self) -> Arc<MockVm> {
        self.stream.shutdown(Shutdown::Both).unwrap();
        self.join()
    }

    /// Waits for the interpreter thread to end.
    pub fn join(mut self) -> Arc<MockVm> {
        if let Some(interpreter) = self.interpreter.take() {
            interpreter.join().unwrap();
        }
        self.vm.clone()
    }
}
