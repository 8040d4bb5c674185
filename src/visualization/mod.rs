pub mod granuflow_vis3d;
