pub mod knowledge_graph;
