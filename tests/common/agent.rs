//! In-process SNMP agent for testing.
//!
//! Answers v1/v2c GET and SET from an in-memory table on an ephemeral
//! localhost port, and stops when dropped.

use bytes::Bytes;
use snmpy::message::CommunityMessage;
use snmpy::{Oid, Pdu, PduType, Value, VarBind};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::common::fixtures::{COMMUNITY_RO, COMMUNITY_RW};

/// notWritable, answered for SETs of objects the agent does not hold.
const NOT_WRITABLE: i32 = 17;

#[derive(Default)]
struct State {
    data: BTreeMap<Oid, Value>,
    requests: Vec<CommunityMessage>,
    silent: bool,
}

/// An in-process SNMP agent for testing.
///
/// Datagrams with the wrong community for their PDU type are dropped, as
/// net-snmp does. A silent agent records requests but never answers.
pub struct TestAgent {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    task: JoinHandle<()>,
}

impl TestAgent {
    /// Create an agent serving `data`.
    pub async fn with_data(data: BTreeMap<Oid, Value>) -> Self {
        let state = State {
            data,
            ..Default::default()
        };
        Self::start(state).await
    }

    /// Create an agent that never responds.
    pub async fn silent() -> Self {
        let state = State {
            silent: true,
            ..Default::default()
        };
        Self::start(state).await
    }

    async fn start(state: State) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().expect("test agent address");
        let state = Arc::new(Mutex::new(state));

        let task = tokio::spawn(serve(socket, state.clone()));

        Self { addr, state, task }
    }

    /// Get the agent's listening address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get a value from the table (cloned).
    pub fn get(&self, oid: &Oid) -> Option<Value> {
        self.state.lock().unwrap().data.get(oid).cloned()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<CommunityMessage> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(socket: UdpSocket, state: Arc<Mutex<State>>) {
    let mut buf = vec![0u8; 65535];
    loop {
        let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };

        let response = handle(&mut state.lock().unwrap(), request);
        if let Some(response) = response {
            let _ = socket.send_to(&response.encode(), peer).await;
        }
    }
}

fn handle(state: &mut State, request: CommunityMessage) -> Option<CommunityMessage> {
    state.requests.push(request.clone());
    if state.silent {
        return None;
    }

    let community = match request.pdu.pdu_type {
        PduType::GetRequest => COMMUNITY_RO,
        PduType::SetRequest => COMMUNITY_RW,
        _ => return None,
    };
    if &request.community[..] != community.as_bytes() {
        return None;
    }

    let mut pdu = Pdu::response(request.pdu.request_id, Vec::new());
    for (i, vb) in request.pdu.varbinds.iter().enumerate() {
        match request.pdu.pdu_type {
            PduType::GetRequest => {
                let value = state
                    .data
                    .get(&vb.oid)
                    .cloned()
                    .unwrap_or(Value::NoSuchInstance);
                pdu.varbinds.push(VarBind::new(vb.oid.clone(), value));
            }
            _ => {
                if state.data.contains_key(&vb.oid) {
                    state.data.insert(vb.oid.clone(), vb.value.clone());
                } else if pdu.error_status == 0 {
                    pdu.error_status = NOT_WRITABLE;
                    pdu.error_index = i as i32 + 1;
                }
                pdu.varbinds.push(vb.clone());
            }
        }
    }

    Some(CommunityMessage::new(
        request.version,
        request.community,
        pdu,
    ))
}
