mod clue_requests;
mod session_flow;
